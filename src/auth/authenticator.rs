//! Authenticator implementation
//!
//! Applies the session token from a `TokenStore` to outgoing requests.

use super::token::TokenStore;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use std::fmt;
use std::sync::Arc;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<dyn TokenStore>,
}

impl Authenticator {
    /// Create an authenticator reading from the given store
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// The backing token store
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Apply authentication to a request builder
    ///
    /// The token is sent as-is in `Authorization`, without a scheme. Requests
    /// go out unauthenticated when no token is stored.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => req.header(AUTHORIZATION, token),
            None => req,
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("has_token", &self.tokens.has_token())
            .finish()
    }
}
