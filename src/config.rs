//! Client configuration
//!
//! Settings for reaching the RocketReserver GraphQL server, loaded from a
//! YAML or JSON file. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Public tutorial server
pub const DEFAULT_SERVER_URL: &str = "https://apollo-fullstack-tutorial.herokuapp.com/graphql";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for the GraphQL client and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// GraphQL endpoint
    pub server_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for queries (mutations are never retried)
    pub max_retries: u32,

    /// Backoff between retries
    pub backoff: BackoffType,

    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,

    /// Client-side rate limiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent string
    pub user_agent: String,

    /// Upper bound on pages fetched by `launches`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_limit: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            rate_limit: None,
            user_agent: format!("rocket-reserver/{}", env!("CARGO_PKG_VERSION")),
            page_limit: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML or JSON file
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            read => read
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?,
        };

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };
        let config =
            parsed.with_context(|| format!("Invalid config file '{}'", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the client unusable
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.server_url)
            .map_err(|e| Error::invalid_value("server_url", e.to_string()))?;

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be greater than 0"));
        }

        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_value(
                "initial_backoff_ms",
                "must not exceed max_backoff_ms",
            ));
        }

        if self.page_limit == Some(0) {
            return Err(Error::invalid_value("page_limit", "must be greater than 0"));
        }

        Ok(())
    }

    /// Transport settings for the HTTP client
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
            .user_agent(&self.user_agent);

        if let Some(ref rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }

        builder.build()
    }
}
