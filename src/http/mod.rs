//! HTTP client module
//!
//! Provides the HTTP transport with retry, rate limiting, and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Session token applied by the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
