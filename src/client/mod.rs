use std::sync::Arc;

pub mod api;
pub mod model;
pub mod service;
pub mod typing;

pub type Result<T> = std::result::Result<T, Error>;
pub type Api = Arc<dyn api::Backend + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no open conversation")]
    NoOpenConversation,
    #[error("backend request failed: {0}")]
    Backend(String),

    #[error(transparent)]
    _Http(#[from] reqwest::Error),
}
