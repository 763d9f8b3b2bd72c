use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;

use crate::{contact, conversation, event, message};

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    #[error("user identity is missing")]
    MissingUserSub,
    #[error("query param is required: {0}")]
    QueryParamRequired(String),

    _Conversation(#[from] conversation::Error),
    _Message(#[from] message::Error),
    _Contact(#[from] contact::Error),
    _Event(#[from] event::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self:?}");

        let message = self.to_string();
        let status = match self {
            Self::MissingUserSub => StatusCode::UNAUTHORIZED,
            Self::QueryParamRequired(_) => StatusCode::BAD_REQUEST,

            Self::_Conversation(e) => StatusCode::from(e),
            Self::_Message(e) => StatusCode::from(e),
            Self::_Contact(e) => StatusCode::from(e),
            Self::_Event(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_owned()
        } else {
            message
        };

        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        (status, Json(ErrorResponse { message })).into_response()
    }
}
