use crate::cli::actions::Action;
use anyhow::{Context, Result};
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let service_url = matches
        .get_one::<String>("service-url")
        .cloned()
        .context("missing required argument: --service-url")?;

    let anon_key = matches
        .get_one::<String>("anon-key")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --anon-key")?;

    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        service_url,
        anon_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn test_handler_builds_server_action() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "venu",
            "--port",
            "8080",
            "--service-url",
            "https://project.supabase.co",
            "--anon-key",
            "anon-key",
        ])?;

        let Action::Server {
            port,
            service_url,
            anon_key,
        } = handler(&matches)?;

        assert_eq!(port, 8080);
        assert_eq!(service_url, "https://project.supabase.co");
        assert_eq!(anon_key.expose_secret(), "anon-key");
        Ok(())
    }
}
