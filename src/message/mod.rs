use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{conversation, state::AppState};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn repository::MessageRepository + Send + Sync>;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/messages", post(handler::create))
        .route("/messages", get(handler::find_all))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message not found: {0:?}")]
    NotFound(Id),
    #[error("message text is empty")]
    EmptyText,
    #[error("not a member of the conversation")]
    NotMember,

    #[error(transparent)]
    _Conversation(#[from] conversation::Error),
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyText => StatusCode::BAD_REQUEST,
            Error::NotMember => StatusCode::FORBIDDEN,
            Error::_Conversation(e) => StatusCode::from(e),
        }
    }
}
