use secrecy::SecretString;

/// Settings shared by everything that talks to the hosted collaborators.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub service_url: String,
    pub anon_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(service_url: String, anon_key: SecretString) -> Self {
        Self {
            service_url,
            anon_key,
        }
    }
}
