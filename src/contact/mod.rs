use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{state::AppState, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn repository::ContactRepository + Send + Sync>;
pub type Service = Arc<dyn service::ContactService + Send + Sync>;

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
        .route("/contacts", post(handler::create))
        .route("/contacts/{id}/accept", put(handler::accept))
        .route("/contacts/{id}/reject", put(handler::reject))
        .route("/contacts/pending/count", get(handler::pending_count))
        .with_state(s)
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum Status {
    Pending { initiator: user::Sub },
    Accepted,
    Rejected,
}

pub enum StatusTransition<'a> {
    Accept { responder: &'a user::Sub },
    Reject { responder: &'a user::Sub },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("contact not found: {0:?}")]
    NotFound(Id),
    #[error("contact ({0:?} : {1:?}) already exists")]
    AlreadyExists(user::Sub, user::Sub),
    #[error("cannot create contact with oneself")]
    SelfReference,
    #[error("could not transition contact status")]
    StatusTransitionFailed,
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyExists(..) => StatusCode::CONFLICT,
            Error::SelfReference | Error::StatusTransitionFailed => StatusCode::BAD_REQUEST,
        }
    }
}
