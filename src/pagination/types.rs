//! Pagination types
//!
//! Snapshot, response and failure types published by the pagination engine.

use crate::error::Error;
use crate::types::Response;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Where a failed page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The fetch itself could not complete (network, HTTP, decoding)
    Transport,
    /// A caller-supplied callback or executor panicked
    Collaborator,
}

/// A failed page fetch, recorded in the snapshot instead of being returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable message
    pub message: String,
    /// Whether retrying is likely to help
    pub retryable: bool,
}

impl FetchFailure {
    /// Create a transport failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    /// Create a collaborator failure for the named stage
    pub fn collaborator(stage: &str, message: impl AsRef<str>) -> Self {
        Self {
            kind: FailureKind::Collaborator,
            message: format!("{stage} panicked: {}", message.as_ref()),
            retryable: true,
        }
    }

    /// Check if this is a transport failure
    pub fn is_transport(&self) -> bool {
        self.kind == FailureKind::Transport
    }
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<Error> for FetchFailure {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of the last page fetch
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse<R> {
    /// The fetch completed; the response may still carry application errors
    Success(Response<R>),
    /// The fetch did not complete
    Failure(FetchFailure),
}

impl<R> PageResponse<R> {
    /// Check if the fetch completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Check if the fetch failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The response, if the fetch completed
    pub fn response(&self) -> Option<&Response<R>> {
        match self {
            Self::Success(response) => Some(response),
            Self::Failure(_) => None,
        }
    }

    /// The failure, if the fetch did not complete
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// What a list consumer should show after the last loaded item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFooter {
    /// More pages exist; keep loading
    Loading,
    /// The last fetch failed or reported errors; offer a retry
    Retry(String),
    /// Everything has been loaded
    End,
}

/// Immutable snapshot of a pagination engine
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T, R> {
    /// Accumulated items in page order
    pub items: Vec<T>,
    /// Outcome of the most recent fetch
    pub last_response: Option<PageResponse<R>>,
    /// Whether another `load_more` may fetch a page
    pub has_more: bool,
    /// True until the first fetch completes (successfully or not)
    pub is_loading_first_page: bool,
    /// True while a fetch is in flight
    pub is_loading: bool,
    /// Number of successful responses merged so far
    pub pages_loaded: usize,
}

impl<T, R> Default for PaginationState<T, R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            last_response: None,
            has_more: true,
            is_loading_first_page: true,
            is_loading: false,
            pages_loaded: 0,
        }
    }
}

impl<T, R> PaginationState<T, R> {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if at least one fetch has completed
    pub fn has_loaded_first_page(&self) -> bool {
        self.last_response.is_some()
    }

    /// Failure recorded by the last fetch, if it failed
    pub fn failure(&self) -> Option<&FetchFailure> {
        self.last_response.as_ref().and_then(PageResponse::failure)
    }

    /// Message describing what went wrong with the last fetch, if anything
    pub fn error_message(&self) -> Option<String> {
        match self.last_response.as_ref()? {
            PageResponse::Failure(failure) => Some(failure.message.clone()),
            PageResponse::Success(response) => response.first_error_message().map(str::to_string),
        }
    }

    /// Decide what to show after the loaded items
    pub fn footer(&self) -> ListFooter {
        if let Some(message) = self.error_message() {
            ListFooter::Retry(message)
        } else if self.has_more {
            ListFooter::Loading
        } else {
            ListFooter::End
        }
    }

    /// A first-page error replaces the whole list with an error state
    pub fn is_first_page_error(&self) -> bool {
        self.items.is_empty() && matches!(self.footer(), ListFooter::Retry(_))
    }
}

/// Result of a `load_more` call
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus<T, R> {
    /// A fetch ran and this snapshot was published
    Loaded(PaginationState<T, R>),
    /// Another fetch was already in flight; nothing happened
    InFlight,
    /// No more pages; nothing happened
    Exhausted,
}

impl<T, R> LoadStatus<T, R> {
    /// The published snapshot, if a fetch ran
    pub fn state(&self) -> Option<&PaginationState<T, R>> {
        match self {
            Self::Loaded(state) => Some(state),
            Self::InFlight | Self::Exhausted => None,
        }
    }

    /// Check if a fetch ran
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Append `page` to `items`, skipping anything whose key is already present
///
/// Re-merging the same page is a no-op, which keeps retries from duplicating
/// items.
pub fn append_unique<T, K, I, F>(items: &[T], page: I, key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = items.iter().map(&key).collect();
    let mut merged = items.to_vec();
    for item in page {
        if seen.insert(key(&item)) {
            merged.push(item);
        }
    }
    merged
}
