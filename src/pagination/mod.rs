//! Pagination module
//!
//! Incremental cursor-based pagination with single-flight loading.
//!
//! # Overview
//!
//! A `PaginationEngine` is assembled from three caller-supplied functions
//! and an executor:
//!
//! - `fetch_next` - builds the next request from the previous response
//! - `merge` - folds a response into the accumulated items
//! - `has_more` - decides whether another page exists
//! - `PageExecutor` - runs a request (the only I/O)
//!
//! Consumers call `load_more()` and read immutable `PaginationState`
//! snapshots via `snapshot()` or `subscribe()`.

mod engine;
mod types;

pub use engine::{PageExecutor, PaginationEngine, PaginationEngineBuilder};
pub use types::{
    append_unique, FailureKind, FetchFailure, ListFooter, LoadStatus, PageResponse,
    PaginationState,
};

#[cfg(test)]
mod tests;
