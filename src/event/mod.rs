use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub mod context;
mod handler;
pub mod model;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub fn ws_router<S>(s: AppState) -> Router<S> {
    Router::new().route("/ws", get(handler::ws)).with_state(s)
}

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    _ParseJson(#[from] serde_json::Error),
}
