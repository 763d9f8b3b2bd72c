use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::user;
use crate::user::model::UserInfo;

use super::model::ContactDto;
use super::{Id, Status};

/// The caller posts its own display fields; they are denormalized into the
/// push event so the other side renders it without a profile fetch.
#[derive(Deserialize)]
pub struct CreateParams {
    recipient: user::Sub,
    name: String,
    #[serde(default)]
    picture: String,
}

pub async fn create(
    Extension(logged_sub): Extension<user::Sub>,
    contact_service: State<crate::contact::Service>,
    Json(params): Json<CreateParams>,
) -> crate::Result<Json<ContactDto>> {
    let initiator = UserInfo {
        sub: logged_sub,
        name: params.name,
        picture: params.picture,
    };

    let dto = contact_service
        .create(&initiator, &params.recipient)
        .await?;
    Ok(Json(dto))
}

#[derive(Deserialize)]
pub struct RespondParams {
    name: String,
    #[serde(default)]
    picture: String,
}

pub async fn accept(
    Extension(logged_sub): Extension<user::Sub>,
    Path(id): Path<Id>,
    contact_service: State<crate::contact::Service>,
    Json(params): Json<RespondParams>,
) -> crate::Result<Json<Status>> {
    let responder = UserInfo {
        sub: logged_sub,
        name: params.name,
        picture: params.picture,
    };

    let status = contact_service.accept(&id, &responder).await?;
    Ok(Json(status))
}

pub async fn reject(
    Extension(logged_sub): Extension<user::Sub>,
    Path(id): Path<Id>,
    contact_service: State<crate::contact::Service>,
) -> crate::Result<Json<Status>> {
    let status = contact_service.reject(&id, &logged_sub).await?;
    Ok(Json(status))
}

#[derive(Serialize)]
pub struct PendingCount {
    count: usize,
}

pub async fn pending_count(
    Extension(logged_sub): Extension<user::Sub>,
    contact_service: State<crate::contact::Service>,
) -> crate::Result<Json<PendingCount>> {
    let count = contact_service.pending_count(&logged_sub).await?;
    Ok(Json(PendingCount { count }))
}
