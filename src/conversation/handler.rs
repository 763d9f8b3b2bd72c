use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::user;

use super::model::ConversationDto;
use super::service::ConversationService;
use super::Id;

#[derive(Deserialize)]
pub struct CreateParams {
    recipient: user::Sub,
}

pub async fn create(
    Extension(logged_sub): Extension<user::Sub>,
    conversation_service: State<ConversationService>,
    Json(params): Json<CreateParams>,
) -> crate::Result<Json<ConversationDto>> {
    let dto = conversation_service
        .get_or_create(&logged_sub, &params.recipient)
        .await?;
    Ok(Json(dto))
}

pub async fn find_all(
    Extension(logged_sub): Extension<user::Sub>,
    conversation_service: State<ConversationService>,
) -> crate::Result<Json<Vec<ConversationDto>>> {
    let dtos = conversation_service.find_all(&logged_sub).await?;
    Ok(Json(dtos))
}

pub async fn find_one(
    Extension(logged_sub): Extension<user::Sub>,
    Path(id): Path<Id>,
    conversation_service: State<ConversationService>,
) -> crate::Result<Json<ConversationDto>> {
    let dto = conversation_service.find_by_id(&id, &logged_sub).await?;
    Ok(Json(dto))
}
