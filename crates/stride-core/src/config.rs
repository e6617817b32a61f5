//! Navigation core configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound for a single fetch, in seconds
    pub request_timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
    /// Accept header sent with every request
    pub accept: String,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: format!("stride/{}", env!("CARGO_PKG_VERSION")),
            accept: "text/html, application/xhtml+xml".to_string(),
            log_filter: "info".to_string(),
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.accept.trim().is_empty() {
            return Err(CoreError::Config("accept cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
