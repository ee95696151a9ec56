//! Authentication module
//!
//! A `TokenStore` holds the session token returned by login, and the
//! `Authenticator` attaches it to every request as the `Authorization`
//! header.

mod authenticator;
mod token;

pub use authenticator::Authenticator;
pub use token::{MemoryTokenStore, TokenStore};
