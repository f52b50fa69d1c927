//! Runtime configuration read from the environment.

use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog API; `/products` is resolved against it.
    pub base_url: Url,
    /// Per-request timeout. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
    /// Capacity of the actor's request channel.
    pub buffer_size: usize,
    pub merge_pending_on_load: bool,
}

impl Config {
    /// A config for `base_url` with every optional setting at its default.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            merge_pending_on_load: false,
        }
    }

    /// Reads `CATALOG_API_URL`, `CATALOG_REQUEST_TIMEOUT_SECS`, `CATALOG_BUFFER_SIZE`
    /// and `CATALOG_MERGE_PENDING_ON_LOAD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("CATALOG_API_URL").ok_or(ConfigError::Missing("CATALOG_API_URL"))?;
        let base_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            name: "CATALOG_API_URL",
            value: raw_url.clone(),
            reason: e.to_string(),
        })?;

        let mut config = Self::new(base_url);

        if let Some(raw) = lookup("CATALOG_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = parse_var("CATALOG_REQUEST_TIMEOUT_SECS", &raw)?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup("CATALOG_BUFFER_SIZE") {
            let size: usize = parse_var("CATALOG_BUFFER_SIZE", &raw)?;
            // tokio rejects a zero-capacity channel
            if size == 0 {
                return Err(ConfigError::Invalid {
                    name: "CATALOG_BUFFER_SIZE",
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.buffer_size = size;
        }

        if let Some(raw) = lookup("CATALOG_MERGE_PENDING_ON_LOAD") {
            config.merge_pending_on_load = match raw.trim() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "CATALOG_MERGE_PENDING_ON_LOAD",
                        value: raw,
                        reason: "must be 'true' or 'false'".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }
}

fn parse_var<V>(name: &'static str, raw: &str) -> Result<V, ConfigError>
where
    V: std::str::FromStr,
    V::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: V::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
