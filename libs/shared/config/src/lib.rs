use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgrest_url: String,
    pub postgrest_api_key: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            postgrest_url: env::var("POSTGREST_URL")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_URL not set, using empty value");
                    String::new()
                }),
            postgrest_api_key: env::var("POSTGREST_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_API_KEY not set, using empty value");
                    String::new()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.postgrest_url.is_empty() && !self.postgrest_api_key.is_empty()
    }
}
