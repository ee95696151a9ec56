//! Incremental pagination engine
//!
//! Drives cursor-based fetching one page at a time. Each `load_more` call
//! computes the next request from the last usable response, executes it, and
//! merges the result into the accumulated items. Calls are single-flight: a
//! second call while one is running returns `LoadStatus::InFlight`.
//!
//! State is only mutated after the fetch completes, so dropping a
//! `load_more` future mid-fetch leaves the items untouched.

use super::types::{FetchFailure, ListFooter, LoadStatus, PageResponse, PaginationState};
use crate::error::{Error, Result};
use crate::types::Response;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

type FetchFn<Q, R> = dyn Fn(Option<&Response<R>>) -> Q + Send + Sync;
type MergeFn<T, R> = dyn Fn(&[T], &Response<R>) -> Vec<T> + Send + Sync;
type HasMoreFn<R> = dyn Fn(&Response<R>) -> bool + Send + Sync;

/// Executes a page request
///
/// This is the only place the engine suspends. Transport problems are
/// returned as errors; application-level errors belong in the response.
#[async_trait]
pub trait PageExecutor<Q, R>: Send + Sync {
    /// Execute one page request
    async fn execute(&self, request: Q) -> Result<Response<R>>;
}

/// Builder for [`PaginationEngine`]
pub struct PaginationEngineBuilder<Q, R, T> {
    executor: Arc<dyn PageExecutor<Q, R>>,
    fetch_next: Option<Box<FetchFn<Q, R>>>,
    merge: Option<Box<MergeFn<T, R>>>,
    has_more: Option<Box<HasMoreFn<R>>>,
    name: String,
}

impl<Q, R, T> PaginationEngineBuilder<Q, R, T>
where
    Q: Send + 'static,
    R: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Set the function computing the next request from the previous response
    ///
    /// The previous response is `None` for the first page.
    #[must_use]
    pub fn fetch_next(
        mut self,
        f: impl Fn(Option<&Response<R>>) -> Q + Send + Sync + 'static,
    ) -> Self {
        self.fetch_next = Some(Box::new(f));
        self
    }

    /// Set the function merging a response into the accumulated items
    #[must_use]
    pub fn merge(mut self, f: impl Fn(&[T], &Response<R>) -> Vec<T> + Send + Sync + 'static) -> Self {
        self.merge = Some(Box::new(f));
        self
    }

    /// Set the predicate deciding whether another page exists
    #[must_use]
    pub fn has_more(mut self, f: impl Fn(&Response<R>) -> bool + Send + Sync + 'static) -> Self {
        self.has_more = Some(Box::new(f));
        self
    }

    /// Name used in log output
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<PaginationEngine<Q, R, T>> {
        let fetch_next = self
            .fetch_next
            .ok_or_else(|| Error::pagination("no page fetcher configured"))?;
        let merge = self
            .merge
            .ok_or_else(|| Error::pagination("no item merger configured"))?;
        let has_more = self
            .has_more
            .ok_or_else(|| Error::pagination("no has-more predicate configured"))?;

        let (state, _) = watch::channel(PaginationState::default());

        Ok(PaginationEngine {
            executor: self.executor,
            fetch_next,
            merge,
            has_more,
            state,
            anchor: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            name: self.name,
        })
    }
}

/// Cursor-based incremental pagination engine
pub struct PaginationEngine<Q, R, T> {
    executor: Arc<dyn PageExecutor<Q, R>>,
    fetch_next: Box<FetchFn<Q, R>>,
    merge: Box<MergeFn<T, R>>,
    has_more: Box<HasMoreFn<R>>,
    /// Published snapshots
    state: watch::Sender<PaginationState<T, R>>,
    /// Last response that advanced pagination; input to `fetch_next`
    anchor: Mutex<Option<Response<R>>>,
    in_flight: AtomicBool,
    name: String,
}

impl<Q, R, T> PaginationEngine<Q, R, T>
where
    Q: Send + 'static,
    R: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start building an engine around an executor
    pub fn builder<E>(executor: Arc<E>) -> PaginationEngineBuilder<Q, R, T>
    where
        E: PageExecutor<Q, R> + 'static,
    {
        PaginationEngineBuilder {
            executor,
            fetch_next: None,
            merge: None,
            has_more: None,
            name: "pagination".to_string(),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> PaginationState<T, R> {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshots published after each state change
    pub fn subscribe(&self) -> watch::Receiver<PaginationState<T, R>> {
        self.state.subscribe()
    }

    /// Check if a fetch is running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch and merge the next page
    ///
    /// Never fails: transport errors, application errors and callback panics
    /// all end up in the returned snapshot.
    pub async fn load_more(&self) -> LoadStatus<T, R> {
        let Some(_flight) = FlightGuard::acquire(&self.in_flight, &self.state) else {
            debug!(engine = %self.name, "Page already in flight, ignoring load_more");
            return LoadStatus::InFlight;
        };

        if !self.state.borrow().has_more {
            debug!(engine = %self.name, "No more pages");
            return LoadStatus::Exhausted;
        }

        self.state.send_modify(|s| s.is_loading = true);

        let anchor = self.lock_anchor().clone();
        let snapshot = match self.fetch_page(anchor.as_ref()).await {
            Ok(response) => self.apply_response(response),
            Err(failure) => self.apply_failure(failure),
        };

        LoadStatus::Loaded(snapshot)
    }

    /// Keep loading until exhausted, a page fails or reports errors, or
    /// `max_pages` fetches have run
    pub async fn load_all(&self, max_pages: Option<usize>) -> PaginationState<T, R> {
        let mut fetched = 0;

        while max_pages.map_or(true, |max| fetched < max) {
            match self.load_more().await {
                LoadStatus::Loaded(state) => {
                    fetched += 1;
                    if state.footer() != ListFooter::Loading {
                        return state;
                    }
                }
                LoadStatus::InFlight | LoadStatus::Exhausted => break,
            }
        }

        self.snapshot()
    }

    /// Drop all accumulated state and start over from the first page
    ///
    /// Returns false (and does nothing) while a fetch is in flight.
    pub fn reset(&self) -> bool {
        let Some(_flight) = FlightGuard::acquire(&self.in_flight, &self.state) else {
            return false;
        };

        *self.lock_anchor() = None;
        self.state.send_replace(PaginationState::default());
        debug!(engine = %self.name, "Pagination reset");
        true
    }

    async fn fetch_page(
        &self,
        anchor: Option<&Response<R>>,
    ) -> std::result::Result<Response<R>, FetchFailure> {
        let request = guarded("page fetcher", || (self.fetch_next)(anchor))?;

        match AssertUnwindSafe(self.executor.execute(request))
            .catch_unwind()
            .await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(FetchFailure::from(&err)),
            Err(payload) => Err(FetchFailure::collaborator(
                "page executor",
                panic_message(payload.as_ref()),
            )),
        }
    }

    fn apply_response(&self, response: Response<R>) -> PaginationState<T, R> {
        let current = self.state.borrow().items.clone();

        let merged = match guarded("item merger", || (self.merge)(&current, &response)) {
            Ok(merged) => merged,
            Err(failure) => return self.apply_failure(failure),
        };

        // Errors that blocked the merge say nothing about whether more
        // pages exist.
        let progressed = merged != current;
        let indeterminate = !progressed && response.has_errors();

        let has_more = if indeterminate {
            true
        } else {
            match guarded("has-more predicate", || (self.has_more)(&response)) {
                Ok(has_more) => has_more,
                Err(failure) => return self.apply_failure(failure),
            }
        };

        if indeterminate {
            warn!(
                engine = %self.name,
                error = response.first_error_message().unwrap_or_default(),
                "Page returned errors without new items"
            );
        } else {
            *self.lock_anchor() = Some(response.clone());
        }

        debug!(
            engine = %self.name,
            added = merged.len().saturating_sub(current.len()),
            total = merged.len(),
            has_more,
            "Page merged"
        );

        self.publish(move |s| {
            s.items = merged;
            s.last_response = Some(PageResponse::Success(response));
            s.has_more = has_more;
            s.is_loading = false;
            s.is_loading_first_page = false;
            s.pages_loaded += 1;
        })
    }

    fn apply_failure(&self, failure: FetchFailure) -> PaginationState<T, R> {
        warn!(engine = %self.name, error = %failure, "Page fetch failed");

        self.publish(move |s| {
            s.last_response = Some(PageResponse::Failure(failure));
            s.has_more = true;
            s.is_loading = false;
            s.is_loading_first_page = false;
        })
    }

    fn publish(&self, update: impl FnOnce(&mut PaginationState<T, R>)) -> PaginationState<T, R> {
        self.state.send_modify(update);
        self.snapshot()
    }

    fn lock_anchor(&self) -> MutexGuard<'_, Option<Response<R>>> {
        self.anchor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<Q, R, T> fmt::Debug for PaginationEngine<Q, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("name", &self.name)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Holds the single-flight flag for the duration of one operation
struct FlightGuard<'a, T, R> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<PaginationState<T, R>>,
}

impl<'a, T, R> FlightGuard<'a, T, R> {
    fn acquire(flag: &'a AtomicBool, state: &'a watch::Sender<PaginationState<T, R>>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state })
    }
}

impl<T, R> Drop for FlightGuard<'_, T, R> {
    fn drop(&mut self) {
        // Only reached with is_loading set if the fetch was cancelled.
        self.state.send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
        self.flag.store(false, Ordering::Release);
    }
}

/// Run a caller-supplied callback, turning a panic into a failure
fn guarded<V>(stage: &str, f: impl FnOnce() -> V) -> std::result::Result<V, FetchFailure> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| FetchFailure::collaborator(stage, panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
