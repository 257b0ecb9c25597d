use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::timeframe::Tolerance;

/// Environment variable holding the backend base URL.
pub const ENV_API_URL: &str = "BACKTEST_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "BACKTEST_API_TIMEOUT_SECS";
/// Environment variable forcing a fixed alignment tolerance in milliseconds.
pub const ENV_TOLERANCE_MS: &str = "BACKTEST_ALIGN_TOLERANCE_MS";

/// Client-side configuration for talking to the backtesting API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the backend, without a trailing `/api`
    pub api_base_url: String,

    /// Per-request timeout (ignored on wasm32, where the browser decides)
    pub request_timeout_secs: u64,

    /// Fixed alignment tolerance. When `None`, the tolerance is derived
    /// from each result's timeframe.
    #[serde(default)]
    pub tolerance_override_ms: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            tolerance_override_ms: None,
        }
    }
}

impl ClientSettings {
    /// Defaults overlaid with any `BACKTEST_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientSettings::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            settings.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            settings.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_TOLERANCE_MS) {
            let ms = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TOLERANCE_MS} must be a whole number, got '{raw}'"))
            })?;
            settings.tolerance_override_ms = Some(ms);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(CoreError::Config("API base URL must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "API base URL must start with http:// or https://, got '{url}'"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("Request timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    /// Base URL with surrounding whitespace and trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn tolerance_override(&self) -> Option<Tolerance> {
        self.tolerance_override_ms.map(Tolerance::from_millis)
    }
}
