//! HTTP client with retry and rate limiting
//!
//! Transport for the GraphQL client. Handles:
//! - Automatic retries with configurable backoff
//! - Rate limiting to prevent API throttling
//! - Session token injection via the `Authenticator`
//! - Error classification for retry decisions

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::Authenticator;
use crate::error::{is_retryable_status, Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("rocket-reserver/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// What to do after one attempt
enum Attempt {
    Done(Response),
    Retry { error: Error, delay: Duration },
    Fail(Error),
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Attach an authenticator applied to every request
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::new().json(body))
            .await
    }

    /// Make a POST request with config
    pub async fn post_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::POST, url, config).await
    }

    /// Make a request, retrying transient failures
    ///
    /// Non-2xx responses that are not retried come back as
    /// `Error::HttpStatus` with the response body attached.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);
        let max_retries = config.max_retries.unwrap_or(self.config.max_retries);

        let mut attempt = 0;
        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let outcome = self.attempt(&method, &full_url, &config, attempt).await;
            match outcome {
                Attempt::Done(response) => {
                    debug!("Request succeeded: {method} {full_url}");
                    return Ok(response);
                }
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, .. } if attempt >= max_retries => {
                    if max_retries > 0 {
                        warn!("Giving up on {method} {full_url} after {max_retries} retries: {error}");
                    }
                    return Err(error);
                }
                Attempt::Retry { error, delay } => {
                    warn!(
                        "{error}, attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Send once and classify the outcome
    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        config: &RequestConfig,
        attempt: u32,
    ) -> Attempt {
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        let mut req = self.client.request(method.clone(), url).timeout(timeout);
        for (key, value) in self.config.default_headers.iter().chain(&config.headers) {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }
        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry {
                    error: Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    },
                    delay: self.calculate_backoff(attempt),
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Retry {
                    error: Error::Http(e),
                    delay: self.calculate_backoff(attempt),
                }
            }
            Err(e) => return Attempt::Fail(Error::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = extract_retry_after(&response);
            return Attempt::Retry {
                error: Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
                delay: Duration::from_secs(retry_after).min(self.config.max_backoff),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);
        if is_retryable_status(status.as_u16()) {
            Attempt::Retry {
                error,
                delay: self.calculate_backoff(attempt),
            }
        } else {
            Attempt::Fail(error)
        }
    }

    /// Make a request and parse JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Invalid JSON response from {url}: {e}")))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                if path.is_empty() {
                    base.to_string()
                } else {
                    format!("{base}/{path}")
                }
            }
            None => path.to_string(),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self
                .config
                .initial_backoff
                .saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value (seconds)
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
}
