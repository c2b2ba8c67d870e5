use crate::lookup::OpenAiConfig;
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Process configuration, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_url: String,
    pub openai: OpenAiConfig,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(source: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| source(var).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                expected: "a port number",
                value,
            })?,
            None => 5001,
        };
        let timeout_secs = match get("LOOKUP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "LOOKUP_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value,
            })?,
            None => 30,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            db_url: get("DB_URL").unwrap_or_else(|| "sqlite://flashcards.db".to_string()),
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}
