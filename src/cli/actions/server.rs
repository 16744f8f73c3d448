use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::venu;
use anyhow::{anyhow, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            service_url,
            anon_key,
        } => {
            let url = Url::parse(&service_url)?;

            match url.scheme() {
                "http" | "https" => (),
                scheme => return Err(anyhow!("unsupported service URL scheme: {scheme}")),
            }

            let globals = GlobalArgs::new(service_url, anon_key);

            venu::new(port, globals).await?;
        }
    }

    Ok(())
}
