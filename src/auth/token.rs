//! Token storage contract
//!
//! The crate only needs to read and write a session token; where it lives
//! is up to the embedder.

use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Getter/setter contract for the session token
pub trait TokenStore: Send + Sync {
    /// Current token, if logged in
    fn token(&self) -> Option<String>;

    /// Replace the stored token
    fn set_token(&self, token: String);

    /// Forget the stored token
    fn clear(&self);

    /// Check if a token is present
    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// In-process token store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("has_token", &self.has_token())
            .finish()
    }
}
