// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # RocketReserver
//!
//! Client library for the RocketReserver GraphQL API, built around an
//! incremental cursor-based pagination engine.
//!
//! ## Features
//!
//! - **Pagination engine**: single-flight `load_more`, failures that keep
//!   already-loaded items, snapshots published over a `watch` channel
//! - **GraphQL client**: typed operations over a retrying, rate-limited
//!   HTTP transport
//! - **Session tokens**: pluggable token store, raw `Authorization` header
//! - **Launch API**: launch list, launch details, booking and login
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rocket_reserver::api::launch_list_engine;
//! use rocket_reserver::auth::MemoryTokenStore;
//! use rocket_reserver::{ClientConfig, GraphQlClient, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let tokens = Arc::new(MemoryTokenStore::new());
//!     let client = GraphQlClient::from_config(&ClientConfig::default(), tokens)?;
//!
//!     let engine = launch_list_engine(Arc::new(client))?;
//!     let state = engine.load_all(Some(3)).await;
//!     for launch in &state.items {
//!         println!("{} {}", launch.id, launch.mission_name());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    api (launches, trips, login)             │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                 │
//! ┌──────────┴──────────┐          ┌───────────┴───────────┐
//! │  PaginationEngine   │─────────▶│     GraphQlClient     │
//! │  fetch/merge/more   │ executor │  Operation → Response │
//! └─────────────────────┘          └───────────┬───────────┘
//!                                              │
//!                              ┌───────────────┴───────────────┐
//!                              │ HttpClient: retry, rate limit │
//!                              │ Authenticator + TokenStore    │
//!                              └───────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Session token storage and request authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Incremental cursor-based pagination
pub mod pagination;

/// GraphQL operations and client
pub mod graphql;

/// RocketReserver operations
pub mod api;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use graphql::{GraphQlClient, Operation};
pub use pagination::{LoadStatus, PageExecutor, PaginationEngine, PaginationState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
