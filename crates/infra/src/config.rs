use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Endpoint of the mail relay that turns notification payloads into
    /// outgoing emails
    pub mailer_url: String,
    /// Api key sent to the mail relay with every delivery
    pub mailer_api_key: String,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let mailer_url = match std::env::var("MAILER_URL") {
            Ok(url) => url,
            Err(_) => {
                let default_mailer_url = "http://localhost:8025/api/send";
                info!(
                    "Did not find MAILER_URL environment variable. Falling back to: {}.",
                    default_mailer_url
                );
                default_mailer_url.into()
            }
        };
        let mailer_api_key = std::env::var("MAILER_API_KEY").unwrap_or_default();
        Self {
            port,
            mailer_url,
            mailer_api_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
