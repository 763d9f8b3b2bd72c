use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::error::Error;
use crate::{conversation, user};

use super::model::Message;
use super::service::MessageService;

#[derive(Deserialize)]
pub struct CreateParams {
    conversation_id: conversation::Id,
    recipient: user::Sub,
    text: String,
}

pub async fn create(
    Extension(logged_sub): Extension<user::Sub>,
    message_service: State<MessageService>,
    Json(params): Json<CreateParams>,
) -> crate::Result<(StatusCode, Json<Message>)> {
    let msg = Message::new(
        params.conversation_id,
        logged_sub,
        params.recipient,
        &params.text,
    );
    let msg = message_service.create(&msg).await?;

    Ok((StatusCode::CREATED, Json(msg)))
}

#[derive(Deserialize)]
pub struct FindAllParams {
    conversation_id: Option<conversation::Id>,
    end_time: Option<i64>,
    limit: Option<usize>,
}

pub async fn find_all(
    Extension(logged_sub): Extension<user::Sub>,
    Query(params): Query<FindAllParams>,
    message_service: State<MessageService>,
) -> crate::Result<Json<Vec<Message>>> {
    let conversation_id = params
        .conversation_id
        .ok_or(Error::QueryParamRequired("conversation_id".to_owned()))?;

    let messages = message_service
        .find_by_conversation_id(&logged_sub, &conversation_id, params.limit, params.end_time)
        .await?;

    Ok(Json(messages))
}
