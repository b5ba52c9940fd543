//! # Client Configuration
//!
//! Connection settings for the Legitmark API. Values are layered, highest precedence
//! first:
//!
//! 1. `LEGITMARK_*` environment variables
//! 2. An optional TOML/YAML/JSON config file
//! 3. [`LegitmarkConfig::default`]

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{LegitmarkError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.legitmark.com";
pub const ENV_PREFIX: &str = "LEGITMARK";

/// Client configuration
///
/// ```rust
/// use legitmark::LegitmarkConfig;
///
/// let config = LegitmarkConfig::default();
/// assert_eq!(config.base_url, "https://api.legitmark.com");
/// assert_eq!(config.timeout_ms, 30000);
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegitmarkConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Partner API key, sent as a bearer token
    pub api_key: String,
    /// Per-call request timeout in milliseconds
    pub timeout_ms: u64,
    /// Attempts for idempotent reads (1 = no retry)
    pub max_retries: u32,
    pub user_agent: String,
}

impl std::fmt::Debug for LegitmarkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegitmarkConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for LegitmarkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: 30000,
            max_retries: 3,
            user_agent: format!("legitmark-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LegitmarkConfig {
    /// Configuration with an explicit API key and defaults for everything else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load from `LEGITMARK_*` environment variables over defaults
    pub fn from_env() -> Result<Self> {
        let config = Self::build(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a config file, then apply environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(LegitmarkError::configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = Self::build(Some(path))?;
        config.validate()?;
        Ok(config)
    }

    fn build(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)
            .and_then(|b| b.set_default("api_key", defaults.api_key))
            .and_then(|b| b.set_default("timeout_ms", defaults.timeout_ms))
            .and_then(|b| b.set_default("max_retries", defaults.max_retries))
            .and_then(|b| b.set_default("user_agent", defaults.user_agent))
            .map_err(config_error)?;

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading Legitmark config file");
            builder = builder.add_source(config::File::from(path));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(config_error)
    }

    /// Reject configurations that can never produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LegitmarkError::configuration(
                "LEGITMARK_API_KEY is not set",
            ));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            LegitmarkError::configuration(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        if self.timeout_ms == 0 {
            return Err(LegitmarkError::configuration(
                "timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn config_error(error: config::ConfigError) -> LegitmarkError {
    LegitmarkError::configuration(format!("Failed to load configuration: {error}")).with_cause(error)
}
