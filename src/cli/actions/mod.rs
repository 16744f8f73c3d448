pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        service_url: String,
        anon_key: SecretString,
    },
}
