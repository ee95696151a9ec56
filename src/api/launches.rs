//! Launch list and launch details

use super::models::{LaunchDetailsData, LaunchListData, LaunchSummary};
use crate::error::Result;
use crate::graphql::{GraphQlClient, Operation};
use crate::pagination::{append_unique, PaginationEngine};
use crate::types::{JsonValue, Response, ResponseError};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Engine paging through all launches
pub type LaunchListEngine = PaginationEngine<LaunchListQuery, LaunchListData, LaunchSummary>;

// ============================================================================
// Launch List
// ============================================================================

/// Page of launches after `cursor` (from the start when `None`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchListQuery {
    pub cursor: Option<String>,
}

impl Operation for LaunchListQuery {
    type Data = LaunchListData;
    const NAME: &'static str = "LaunchList";
    const DOCUMENT: &'static str = "query LaunchList($cursor: String) { \
        launches(after: $cursor) { \
        cursor hasMore \
        launches { id site mission { name missionPatch(size: SMALL) } } \
        } }";

    fn variables(&self) -> JsonValue {
        json!({ "cursor": self.cursor })
    }
}

/// Build an engine that walks the launch list page by page
///
/// Each page is requested with the previous page's cursor. Launches are
/// deduplicated by id, and paging stops once the server reports
/// `hasMore: false`.
pub fn launch_list_engine(client: Arc<GraphQlClient>) -> Result<LaunchListEngine> {
    LaunchListEngine::builder(client)
        .name("launches")
        .fetch_next(next_launch_page)
        .merge(|launches, response| {
            append_unique(launches, page_launches(response), |l| l.id.clone())
        })
        .has_more(|response| {
            response
                .data
                .as_ref()
                .is_some_and(|data| data.launches.has_more)
        })
        .build()
}

fn next_launch_page(previous: Option<&Response<LaunchListData>>) -> LaunchListQuery {
    LaunchListQuery {
        cursor: previous
            .and_then(|r| r.data.as_ref())
            .and_then(|data| data.launches.cursor.clone()),
    }
}

fn page_launches(response: &Response<LaunchListData>) -> Vec<LaunchSummary> {
    response
        .data
        .iter()
        .flat_map(|data| data.launches.launches.iter().flatten().cloned())
        .collect()
}

// ============================================================================
// Launch Details
// ============================================================================

/// A single launch by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDetailsQuery {
    pub id: String,
}

impl Operation for LaunchDetailsQuery {
    type Data = LaunchDetailsData;
    const NAME: &'static str = "LaunchDetails";
    const DOCUMENT: &'static str = "query LaunchDetails($id: ID!) { \
        launch(id: $id) { \
        id site \
        mission { name missionPatch(size: LARGE) } \
        rocket { name type } \
        isBooked \
        } }";

    fn variables(&self) -> JsonValue {
        json!({ "id": self.id })
    }
}

/// What the details view shows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LaunchDetailsState {
    /// Request not finished yet
    #[default]
    Loading,
    /// The request never produced a GraphQL response
    ProtocolError(String),
    /// The server answered with errors
    BackendError(Vec<ResponseError>),
    Success(LaunchDetailsData),
}

impl LaunchDetailsState {
    /// Check if the state is final
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Fetch one launch and classify the outcome
pub async fn launch_details(client: &GraphQlClient, id: &str) -> LaunchDetailsState {
    let query = LaunchDetailsQuery { id: id.to_string() };

    match client.execute(&query).await {
        Err(e) => {
            warn!(launch = id, "Failed to load launch details: {e}");
            LaunchDetailsState::ProtocolError(e.to_string())
        }
        Ok(response) if response.has_errors() => {
            LaunchDetailsState::BackendError(response.errors)
        }
        Ok(Response { data: Some(data), .. }) => LaunchDetailsState::Success(data),
        Ok(Response { data: None, .. }) => {
            LaunchDetailsState::ProtocolError("response contained no data".to_string())
        }
    }
}
