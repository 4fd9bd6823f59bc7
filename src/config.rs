use std::{env, time::Duration};

use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE_NAME: &str = "JourneyGo";
const OPENAI_BASE_URL: &str = "https://api.openai.com";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const RETRY_DELAY_MS: u64 = 1000;
const DEV_JWT_SECRET: &str = "journeygo_dev_secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the chat-completion provider behind the recommendation endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub retry_delay: Duration,
}

impl ProviderConfig {
    /// The API key with everything but its edges hidden, for health output.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() > 8 {
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}***{}", head, tail)
            } else {
                "***".to_string()
            }
        })
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub jwt_secret: String,
    pub provider: ProviderConfig,
    /// Origin the offline app shell is installed from. Unset disables the shell.
    pub static_origin: Option<String>,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => PORT,
        };

        let retry_delay_ms = match var("AI_RETRY_DELAY_MS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "AI_RETRY_DELAY_MS",
                value,
            })?,
            None => RETRY_DELAY_MS,
        };

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => DEV_JWT_SECRET.to_string(),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            mongodb_uri: var("MONGODB_URI"),
            database_name: var("MONGODB_DATABASE").unwrap_or_else(|| DATABASE_NAME.to_string()),
            jwt_secret,
            provider: ProviderConfig {
                api_key: var("OPENAI_API_KEY"),
                base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                model: var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_MODEL.to_string()),
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
            static_origin: var("STATIC_ORIGIN"),
            environment: var("RUST_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }
}
