use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{state::AppState, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn repository::ConversationRepository + Send + Sync>;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn get(&self) -> &Uuid {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered two-party membership. Construction normalizes the order so the
/// same pair always compares and hashes equal, which is what makes
/// get-or-create idempotent.
#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Members([user::Sub; 2]);

impl Members {
    pub fn new(a: user::Sub, b: user::Sub) -> Self {
        if a <= b { Self([a, b]) } else { Self([b, a]) }
    }

    pub fn contains(&self, sub: &user::Sub) -> bool {
        self.0.contains(sub)
    }

    /// The member that is not `sub`.
    pub fn other(&self, sub: &user::Sub) -> &user::Sub {
        if self.0[0].eq(sub) {
            &self.0[1]
        } else {
            &self.0[0]
        }
    }
}

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/conversations", get(handler::find_all))
        .route("/conversations", post(handler::create))
        .route("/conversations/{id}", get(handler::find_one))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("conversation not found: {0:?}")]
    NotFound(Id),
    #[error("user is not a member of the conversation")]
    NotMember,
    #[error("cannot start a conversation with oneself")]
    SelfReference,
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NotMember => StatusCode::FORBIDDEN,
            Error::SelfReference => StatusCode::BAD_REQUEST,
        }
    }
}
