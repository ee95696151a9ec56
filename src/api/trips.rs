//! Booking and cancelling trips

use super::models::{BookTripData, CancelTripData};
use crate::auth::TokenStore;
use crate::error::Result;
use crate::graphql::{GraphQlClient, Operation, OperationKind};
use crate::types::{JsonValue, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

/// Book a seat on a launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTripMutation {
    pub id: String,
}

impl Operation for BookTripMutation {
    type Data = BookTripData;
    const NAME: &'static str = "BookTrip";
    const DOCUMENT: &'static str =
        "mutation BookTrip($id: ID!) { bookTrips(launchIds: [$id]) { success message } }";
    const KIND: OperationKind = OperationKind::Mutation;

    fn variables(&self) -> JsonValue {
        json!({ "id": self.id })
    }
}

/// Give up a booked seat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTripMutation {
    pub id: String,
}

impl Operation for CancelTripMutation {
    type Data = CancelTripData;
    const NAME: &'static str = "CancelTrip";
    const DOCUMENT: &'static str =
        "mutation CancelTrip($id: ID!) { cancelTrip(launchId: $id) { success message } }";
    const KIND: OperationKind = OperationKind::Mutation;

    fn variables(&self) -> JsonValue {
        json!({ "id": self.id })
    }
}

/// Result of toggling a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum BookingOutcome {
    /// No session token; nothing was sent
    LoginRequired,
    Booked,
    Cancelled,
    /// The request failed or the server reported errors
    Failed(String),
}

impl BookingOutcome {
    /// Check if the booking changed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Booked | Self::Cancelled)
    }
}

/// Book the launch, or cancel it when `is_booked` is already true
pub async fn toggle_booking(
    client: &GraphQlClient,
    tokens: &dyn TokenStore,
    id: &str,
    is_booked: bool,
) -> BookingOutcome {
    if !tokens.has_token() {
        return BookingOutcome::LoginRequired;
    }

    let id = id.to_string();
    let (result, done) = if is_booked {
        (
            send(client, &CancelTripMutation { id: id.clone() }).await,
            BookingOutcome::Cancelled,
        )
    } else {
        (
            send(client, &BookTripMutation { id: id.clone() }).await,
            BookingOutcome::Booked,
        )
    };

    match result {
        Ok(()) => {
            info!(launch = %id, "Trip {}", if is_booked { "cancelled" } else { "booked" });
            done
        }
        Err(message) => {
            warn!(launch = %id, "Failed to book/cancel trip: {message}");
            BookingOutcome::Failed(message)
        }
    }
}

async fn send<O: Operation>(client: &GraphQlClient, mutation: &O) -> std::result::Result<(), String> {
    let response: Result<Response<O::Data>> = client.execute(mutation).await;
    match response {
        Err(e) => Err(e.to_string()),
        Ok(response) => match response.first_error_message() {
            Some(message) => Err(message.to_string()),
            None => Ok(()),
        },
    }
}
