//! Response payloads for the RocketReserver operations

use serde::{Deserialize, Serialize};

// ============================================================================
// Launches
// ============================================================================

/// Mission flown by a launch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub name: Option<String>,
    /// Patch image URL
    pub mission_patch: Option<String>,
}

/// Launch as shown in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSummary {
    pub id: String,
    pub site: Option<String>,
    pub mission: Option<Mission>,
}

impl LaunchSummary {
    /// Mission name, or an empty string
    pub fn mission_name(&self) -> &str {
        self.mission
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or_default()
    }
}

/// One page of launches
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConnection {
    /// Cursor of the last launch in this page
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    /// Launches; the server may return nulls for entries it failed to resolve
    #[serde(default)]
    pub launches: Vec<Option<LaunchSummary>>,
}

/// `data` of `LaunchList`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaunchListData {
    #[serde(default)]
    pub launches: LaunchConnection,
}

/// Rocket used by a launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rocket {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Full launch record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    pub id: String,
    pub site: Option<String>,
    pub mission: Option<Mission>,
    pub rocket: Option<Rocket>,
    #[serde(default)]
    pub is_booked: bool,
}

/// `data` of `LaunchDetails`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDetailsData {
    pub launch: Option<Launch>,
}

// ============================================================================
// Trips
// ============================================================================

/// Result of a booking change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripUpdateResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// `data` of `BookTrip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTripData {
    pub book_trips: TripUpdateResponse,
}

/// `data` of `CancelTrip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTripData {
    pub cancel_trip: TripUpdateResponse,
}

// ============================================================================
// Login
// ============================================================================

/// Session issued by `login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
}

/// `data` of `Login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub login: Option<Session>,
}
