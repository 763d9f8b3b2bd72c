use axum::Router;
use axum::routing::post;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

mod handler;
pub mod model;

/// Booking CRUD lives in the marketplace backend; this module is only the
/// inbound edge it calls to push lifecycle transitions to connected users.
pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/notifications/booking", post(handler::notify))
        .with_state(s)
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Created,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}
