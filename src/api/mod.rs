//! RocketReserver API
//!
//! # Overview
//!
//! Typed operations against the RocketReserver GraphQL server and the flows
//! built on them:
//!
//! - [`launch_list_engine`] - pages through every launch
//! - [`launch_details`] - one launch, classified into a [`LaunchDetailsState`]
//! - [`toggle_booking`] - books or cancels a seat
//! - [`login`] - obtains and stores a session token

mod launches;
mod login;
mod models;
mod trips;

pub use launches::{
    launch_details, launch_list_engine, LaunchDetailsQuery, LaunchDetailsState, LaunchListEngine,
    LaunchListQuery,
};
pub use login::{login, LoginMutation};
pub use models::{
    BookTripData, CancelTripData, Launch, LaunchConnection, LaunchDetailsData, LaunchListData,
    LaunchSummary, LoginData, Mission, Rocket, Session, TripUpdateResponse,
};
pub use trips::{toggle_booking, BookTripMutation, BookingOutcome, CancelTripMutation};
