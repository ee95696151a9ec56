//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::types::{Response, ResponseError};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_test::{assert_pending, assert_ready};

// ============================================================================
// Test Executor
// ============================================================================

type Cursor = Option<String>;

#[derive(Debug, Clone, PartialEq)]
struct Page {
    items: Vec<u32>,
    cursor: Option<String>,
    has_more: bool,
}

enum Scripted {
    Respond(Response<Page>),
    Fail(Error),
    Panic,
}

/// Replays a fixed script of outcomes and records every request it sees
struct ScriptedExecutor {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<Cursor>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedExecutor {
    fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Each execution waits for a `notify_one` on `gate` before answering
    fn gated(script: Vec<Scripted>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    fn requests(&self) -> Vec<Cursor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageExecutor<Cursor, Page> for ScriptedExecutor {
    async fn execute(&self, request: Cursor) -> Result<Response<Page>> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Panic) => panic!("executor exploded"),
            None => Err(Error::Other("script exhausted".to_string())),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn page(items: &[u32], cursor: Option<&str>, has_more: bool) -> Scripted {
    Scripted::Respond(Response::ok(Page {
        items: items.to_vec(),
        cursor: cursor.map(str::to_string),
        has_more,
    }))
}

fn next_cursor(previous: Option<&Response<Page>>) -> Cursor {
    previous
        .and_then(|r| r.data.as_ref())
        .and_then(|p| p.cursor.clone())
}

fn merge_unique(items: &[u32], response: &Response<Page>) -> Vec<u32> {
    append_unique(
        items,
        response.data.iter().flat_map(|p| p.items.iter().copied()),
        |item| *item,
    )
}

fn page_has_more(response: &Response<Page>) -> bool {
    response.data.as_ref().is_some_and(|p| p.has_more)
}

fn engine_with_merge(
    executor: &Arc<ScriptedExecutor>,
    merge: impl Fn(&[u32], &Response<Page>) -> Vec<u32> + Send + Sync + 'static,
) -> PaginationEngine<Cursor, Page, u32> {
    PaginationEngine::builder(Arc::clone(executor))
        .name("test")
        .fetch_next(next_cursor)
        .merge(merge)
        .has_more(page_has_more)
        .build()
        .unwrap()
}

fn engine_with_callbacks(
    executor: &Arc<ScriptedExecutor>,
    fetch: impl Fn(Option<&Response<Page>>) -> Cursor + Send + Sync + 'static,
    has_more: impl Fn(&Response<Page>) -> bool + Send + Sync + 'static,
) -> PaginationEngine<Cursor, Page, u32> {
    PaginationEngine::builder(Arc::clone(executor))
        .name("test")
        .fetch_next(fetch)
        .merge(merge_unique)
        .has_more(has_more)
        .build()
        .unwrap()
}

fn engine(executor: &Arc<ScriptedExecutor>) -> PaginationEngine<Cursor, Page, u32> {
    engine_with_merge(executor, merge_unique)
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_three_pages_follow_cursors_to_completion() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        page(&[3, 4], Some("B"), true),
        page(&[5], None, false),
    ]);
    let engine = engine(&executor);

    for _ in 0..3 {
        assert!(engine.load_more().await.is_loaded());
    }

    let state = engine.snapshot();
    assert_eq!(state.items, vec![1, 2, 3, 4, 5]);
    assert!(!state.has_more);
    assert_eq!(state.pages_loaded, 3);
    assert!(!state.is_loading);
    assert!(!state.is_loading_first_page);
    assert_eq!(state.footer(), ListFooter::End);
    assert_eq!(
        executor.requests(),
        vec![None, Some("A".to_string()), Some("B".to_string())]
    );
}

#[tokio::test]
async fn test_initial_state() {
    let executor = ScriptedExecutor::new(vec![]);
    let state = engine(&executor).snapshot();

    assert!(state.items.is_empty());
    assert!(state.last_response.is_none());
    assert!(state.has_more);
    assert!(state.is_loading_first_page);
    assert!(!state.has_loaded_first_page());
    assert_eq!(state.footer(), ListFooter::Loading);
}

#[tokio::test]
async fn test_load_more_when_exhausted_is_noop() {
    let executor = ScriptedExecutor::new(vec![page(&[1], None, false)]);
    let engine = engine(&executor);

    engine.load_more().await;
    let before = engine.snapshot();

    assert_eq!(engine.load_more().await, LoadStatus::Exhausted);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(executor.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_last_page_respects_predicate() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1], Some("A"), true),
        page(&[], None, false),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    let status = engine.load_more().await;

    let state = status.state().unwrap();
    assert_eq!(state.items, vec![1]);
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_duplicate_page_is_not_merged_twice() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        page(&[2, 3], None, false),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    engine.load_more().await;

    assert_eq!(engine.snapshot().items, vec![1, 2, 3]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_failure_preserves_items_and_permits_retry() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        Scripted::Fail(Error::http_status(503, "unavailable")),
        page(&[3, 4], None, false),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    let state = engine.load_more().await.state().cloned().unwrap();

    assert_eq!(state.items, vec![1, 2]);
    assert!(state.has_more);
    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Transport);
    assert!(failure.retryable);
    assert_eq!(
        state.footer(),
        ListFooter::Retry("HTTP 503: unavailable".to_string())
    );
    assert!(!state.is_first_page_error());

    // Retrying re-requests the cursor that failed.
    engine.load_more().await;
    assert_eq!(engine.snapshot().items, vec![1, 2, 3, 4]);
    assert_eq!(
        executor.requests(),
        vec![None, Some("A".to_string()), Some("A".to_string())]
    );
}

#[tokio::test]
async fn test_first_page_failure() {
    let executor = ScriptedExecutor::new(vec![Scripted::Fail(Error::Timeout { timeout_ms: 50 })]);
    let engine = engine(&executor);

    let state = engine.load_more().await.state().cloned().unwrap();

    assert!(state.items.is_empty());
    assert!(state.has_more);
    assert!(!state.is_loading_first_page);
    assert_eq!(state.pages_loaded, 0);
    assert!(state.is_first_page_error());
    assert!(state.last_response.as_ref().unwrap().is_failure());
}

#[tokio::test]
async fn test_errors_without_progress_force_has_more() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        Scripted::Respond(Response::from_errors(vec![ResponseError::new(
            "launches resolver failed",
        )])),
        page(&[3], None, false),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    let state = engine.load_more().await.state().cloned().unwrap();

    // page_has_more would say false for a response without data.
    assert!(state.has_more);
    assert_eq!(state.items, vec![1, 2]);
    assert_eq!(
        state.footer(),
        ListFooter::Retry("launches resolver failed".to_string())
    );

    // The errored response does not become the new cursor source.
    engine.load_more().await;
    assert_eq!(
        executor.requests(),
        vec![None, Some("A".to_string()), Some("A".to_string())]
    );
    assert_eq!(engine.snapshot().items, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_errors_with_progress_use_predicate() {
    let partial = Response::ok(Page {
        items: vec![3],
        cursor: None,
        has_more: false,
    })
    .with_error(ResponseError::new("mission patch unavailable"));

    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        Scripted::Respond(partial),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    let state = engine.load_more().await.state().cloned().unwrap();

    assert_eq!(state.items, vec![1, 2, 3]);
    assert!(!state.has_more);
    assert_eq!(
        state.error_message().as_deref(),
        Some("mission patch unavailable")
    );
}

#[tokio::test]
async fn test_merger_panic_is_collaborator_failure() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        page(&[99], Some("B"), true),
    ]);
    let engine = engine_with_merge(&executor, |items, response| {
        assert!(
            !response.data.as_ref().is_some_and(|p| p.items.contains(&99)),
            "poisoned page"
        );
        merge_unique(items, response)
    });

    engine.load_more().await;
    let state = engine.load_more().await.state().cloned().unwrap();

    assert_eq!(state.items, vec![1, 2]);
    assert!(state.has_more);
    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Collaborator);
    assert!(failure.message.starts_with("item merger panicked"));
    assert!(!engine.is_in_flight());
}

#[tokio::test]
async fn test_executor_panic_is_collaborator_failure() {
    let executor = ScriptedExecutor::new(vec![Scripted::Panic, page(&[7], None, false)]);
    let engine = engine(&executor);

    let state = engine.load_more().await.state().cloned().unwrap();
    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Collaborator);
    assert!(failure.message.contains("executor exploded"));

    // Still usable afterwards.
    engine.load_more().await;
    assert_eq!(engine.snapshot().items, vec![7]);
}

#[tokio::test]
async fn test_fetcher_panic_is_collaborator_failure() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        page(&[3], None, false),
    ]);
    let armed = Arc::new(AtomicBool::new(false));
    let engine = {
        let armed = Arc::clone(&armed);
        engine_with_callbacks(
            &executor,
            move |previous| {
                assert!(!armed.swap(false, Ordering::SeqCst), "cursor store offline");
                next_cursor(previous)
            },
            page_has_more,
        )
    };

    engine.load_more().await;
    armed.store(true, Ordering::SeqCst);
    let state = engine.load_more().await.state().cloned().unwrap();

    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Collaborator);
    assert!(failure.message.starts_with("page fetcher panicked"));
    assert!(failure.message.contains("cursor store offline"));
    assert_eq!(state.items, vec![1, 2]);
    assert!(state.has_more);
    assert!(!engine.is_in_flight());
    // The executor never saw the second request.
    assert_eq!(executor.requests(), vec![None]);

    let recovered = engine.load_more().await.state().cloned().unwrap();
    assert_eq!(recovered.items, vec![1, 2, 3]);
    assert!(!recovered.has_more);
    assert_eq!(executor.requests(), vec![None, Some("A".to_string())]);
}

#[tokio::test]
async fn test_predicate_panic_keeps_items() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1, 2], Some("A"), true),
        page(&[3], Some("B"), true),
        page(&[3], None, false),
    ]);
    let engine = engine_with_callbacks(&executor, next_cursor, |response| {
        let data = response.data.as_ref().unwrap();
        assert!(data.cursor.as_deref() != Some("B"), "cursor B is corrupt");
        data.has_more
    });

    engine.load_more().await;
    let state = engine.load_more().await.state().cloned().unwrap();

    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Collaborator);
    assert!(failure.message.starts_with("has-more predicate panicked"));
    assert_eq!(state.items, vec![1, 2]);
    assert!(state.has_more);
    assert!(!engine.is_in_flight());

    // The anchor did not move, so the same cursor is requested again.
    let recovered = engine.load_more().await.state().cloned().unwrap();
    assert_eq!(recovered.items, vec![1, 2, 3]);
    assert!(!recovered.has_more);
    assert_eq!(
        executor.requests(),
        vec![None, Some("A".to_string()), Some("A".to_string())]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_single_flight_ignores_concurrent_load() {
    let gate = Arc::new(Notify::new());
    let executor = ScriptedExecutor::gated(vec![page(&[1], Some("A"), true)], Arc::clone(&gate));
    let engine = engine(&executor);

    let mut first = tokio_test::task::spawn(engine.load_more());
    assert_pending!(first.poll());
    assert!(engine.is_in_flight());
    assert!(engine.snapshot().is_loading);

    assert_eq!(engine.load_more().await, LoadStatus::InFlight);

    gate.notify_one();
    assert!(first.is_woken());
    let status = assert_ready!(first.poll());

    assert_eq!(status.state().unwrap().items, vec![1]);
    assert_eq!(executor.requests().len(), 1);
    assert!(!engine.is_in_flight());
}

#[tokio::test]
async fn test_cancelled_load_leaves_state_untouched() {
    let gate = Arc::new(Notify::new());
    let executor = ScriptedExecutor::gated(vec![page(&[1], None, false)], Arc::clone(&gate));
    let engine = engine(&executor);

    let mut task = tokio_test::task::spawn(engine.load_more());
    assert_pending!(task.poll());
    drop(task);

    let state = engine.snapshot();
    assert!(!engine.is_in_flight());
    assert!(!state.is_loading);
    assert!(state.items.is_empty());
    assert!(state.last_response.is_none());
    assert!(state.is_loading_first_page);

    // The cancelled fetch consumed nothing from the script.
    gate.notify_one();
    engine.load_more().await;
    assert_eq!(engine.snapshot().items, vec![1]);
}

#[tokio::test]
async fn test_subscribers_observe_snapshots() {
    let executor = ScriptedExecutor::new(vec![page(&[1, 2], None, false)]);
    let engine = engine(&executor);
    let mut rx = engine.subscribe();

    assert!(!rx.has_changed().unwrap());
    engine.load_more().await;
    assert!(rx.has_changed().unwrap());

    let state = rx.borrow_and_update().clone();
    assert_eq!(state.items, vec![1, 2]);
    assert!(!state.has_more);
}

// ============================================================================
// Reset / Load All
// ============================================================================

#[tokio::test]
async fn test_reset_starts_over() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1], Some("A"), true),
        page(&[1], Some("A"), true),
    ]);
    let engine = engine(&executor);

    engine.load_more().await;
    assert!(engine.reset());
    assert_eq!(engine.snapshot(), PaginationState::default());

    engine.load_more().await;
    assert_eq!(executor.requests(), vec![None, None]);
}

#[tokio::test]
async fn test_load_all_respects_max_pages() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1], Some("A"), true),
        page(&[2], Some("B"), true),
        page(&[3], None, false),
    ]);
    let engine = engine(&executor);

    let state = engine.load_all(Some(2)).await;
    assert_eq!(state.items, vec![1, 2]);
    assert!(state.has_more);

    let state = engine.load_all(None).await;
    assert_eq!(state.items, vec![1, 2, 3]);
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_load_all_stops_on_failure() {
    let executor = ScriptedExecutor::new(vec![
        page(&[1], Some("A"), true),
        Scripted::Fail(Error::http_status(502, "")),
        page(&[2], None, false),
    ]);
    let engine = engine(&executor);

    let state = engine.load_all(None).await;
    assert_eq!(state.items, vec![1]);
    assert!(state.failure().is_some());
    assert_eq!(executor.requests().len(), 2);
}

// ============================================================================
// Builder / Helpers
// ============================================================================

#[test]
fn test_builder_requires_callbacks() {
    let executor = ScriptedExecutor::new(vec![]);
    let result = PaginationEngine::<Cursor, Page, u32>::builder(executor)
        .fetch_next(next_cursor)
        .has_more(page_has_more)
        .build();

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Pagination error: no item merger configured"
    );
}

#[test]
fn test_append_unique() {
    let merged = append_unique(&[1, 2], vec![2, 3, 3, 4], |i| *i);
    assert_eq!(merged, vec![1, 2, 3, 4]);

    let again = append_unique(&merged, vec![3, 4], |i| *i);
    assert_eq!(again, merged);
}

#[test]
fn test_fetch_failure_from_error() {
    let failure = FetchFailure::from(&Error::http_status(404, "missing"));
    assert!(failure.is_transport());
    assert!(!failure.retryable);
    assert_eq!(failure.to_string(), "HTTP 404: missing");

    let failure = FetchFailure::from(Error::RateLimited {
        retry_after_seconds: 1,
    });
    assert!(failure.retryable);
}

#[test]
fn test_page_response_accessors() {
    let success: PageResponse<u32> = PageResponse::Success(Response::ok(1));
    assert!(success.is_success());
    assert_eq!(success.response().and_then(|r| r.data), Some(1));
    assert!(success.failure().is_none());

    let failure: PageResponse<u32> = PageResponse::Failure(FetchFailure::transport("down"));
    assert!(failure.is_failure());
    assert!(failure.response().is_none());
}
