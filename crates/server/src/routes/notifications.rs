use axum::extract::State;
use axum::Json;
use serde::Serialize;

use service::notification_service::{self, BroadcastInput, NotificationFeed};

use crate::errors::{ApiJson, ApiPath, JsonApiError};
use crate::routes::auth::ServerState;
use crate::session::CurrentUser;

#[derive(Debug, Serialize)]
pub struct Updated {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub created: u64,
}

#[utoipa::path(get, path = "/api/notifications", tag = "notifications", responses((status = 200, description = "Grouped by date with unread count"), (status = 401, description = "Unauthorized")))]
pub async fn feed(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<NotificationFeed>, JsonApiError> {
    Ok(Json(notification_service::feed(&state.db, current.id()).await?))
}

#[utoipa::path(patch, path = "/api/notifications/{id}/read", tag = "notifications", params(("id" = i32, Path, description = "Notification id")), responses((status = 200, description = "Marked read"), (status = 404, description = "Not Found")))]
pub async fn mark_read(State(state): State<ServerState>, current: CurrentUser, ApiPath(id): ApiPath<i32>) -> Result<Json<Updated>, JsonApiError> {
    notification_service::mark_read(&state.db, current.id(), id).await?;
    Ok(Json(Updated { updated: 1 }))
}

#[utoipa::path(post, path = "/api/notifications/read-all", tag = "notifications", responses((status = 200, description = "Number marked read")))]
pub async fn mark_all_read(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<Updated>, JsonApiError> {
    let updated = notification_service::mark_all_read(&state.db, current.id()).await?;
    Ok(Json(Updated { updated }))
}

#[utoipa::path(post, path = "/api/admin/notifications", tag = "admin", request_body = crate::openapi::BroadcastRequest, responses((status = 200, description = "Number created"), (status = 400, description = "Give exactly one of user_id or role")))]
pub async fn broadcast(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<BroadcastInput>,
) -> Result<Json<Created>, JsonApiError> {
    let created = notification_service::broadcast(&state.db, input).await?;
    Ok(Json(Created { created }))
}
