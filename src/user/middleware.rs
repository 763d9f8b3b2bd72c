use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::Error;
use crate::user::Sub;

pub const SUB_HEADER: &str = "x-user-sub";

/// Stashes the caller identity from the `x-user-sub` header into request
/// extensions. Session validation belongs to the auth gateway in front of
/// this service.
pub async fn identify(mut req: Request, next: Next) -> crate::Result<Response> {
    let sub = req
        .headers()
        .get(SUB_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(Sub::from)
        .ok_or(Error::MissingUserSub)?;

    req.extensions_mut().insert(sub);

    Ok(next.run(req).await)
}
