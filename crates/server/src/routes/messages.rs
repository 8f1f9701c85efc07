//! Contact-form messages (admin) and direct messages between users.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{contact_message, direct_message};
use service::grouping::DateGroup;
use service::message_service::{self, Contact, ContactInput, DirectMessageInput, DirectMessageView};
use service::pagination::{Paged, Pagination};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::routes::auth::ServerState;
use crate::session::CurrentUser;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ContactQuery {
    /// `true` for unread only, `false` for read only
    pub unread: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReadFlag {
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct InboxOutput {
    pub unread: u64,
    pub groups: Vec<DateGroup<DirectMessageView>>,
}

#[utoipa::path(post, path = "/api/messages", tag = "messages", request_body = crate::openapi::ContactRequest, responses((status = 201, description = "Message received"), (status = 400, description = "Bad Request")))]
pub async fn submit_contact(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<contact_message::Model>), JsonApiError> {
    let m = message_service::create_contact_message(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/admin/messages", tag = "admin", params(ContactQuery), responses((status = 200, description = "Page of contact messages")))]
pub async fn list_contact(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ContactQuery>,
) -> Result<Json<Paged<contact_message::Model>>, JsonApiError> {
    let page = message_service::list_contact_messages(&state.db, q.unread, Pagination::from_query(q.page, q.per_page)).await?;
    Ok(Json(page))
}

#[utoipa::path(patch, path = "/api/admin/messages/{id}", tag = "admin", params(("id" = i32, Path, description = "Message id")), request_body = crate::openapi::ReadFlagRequest, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn set_contact_read(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(flag): ApiJson<ReadFlag>,
) -> Result<Json<contact_message::Model>, JsonApiError> {
    Ok(Json(message_service::set_contact_read(&state.db, id, flag.is_read).await?))
}

#[utoipa::path(delete, path = "/api/admin/messages/{id}", tag = "admin", params(("id" = i32, Path, description = "Message id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_contact(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !message_service::delete_contact_message(&state.db, id).await? {
        return Err(JsonApiError::not_found("message"));
    }
    info!(id = %id, "contact message deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/inbox", tag = "inbox", responses((status = 200, description = "Messages grouped by date, newest first"), (status = 401, description = "Unauthorized")))]
pub async fn inbox(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<InboxOutput>, JsonApiError> {
    let groups = message_service::inbox(&state.db, current.id()).await?;
    let unread = message_service::unread_direct_count(&state.db, current.id()).await?;
    Ok(Json(InboxOutput { unread, groups }))
}

#[utoipa::path(get, path = "/api/inbox/contacts", tag = "inbox", responses((status = 200, description = "Users the caller may message")))]
pub async fn contacts(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<Vec<Contact>>, JsonApiError> {
    Ok(Json(message_service::contacts(&state.db, current.id(), current.role()).await?))
}

#[utoipa::path(post, path = "/api/inbox", tag = "inbox", request_body = crate::openapi::DirectMessageRequest, responses((status = 201, description = "Sent"), (status = 400, description = "Bad Request"), (status = 403, description = "Recipient is not a contact")))]
pub async fn send(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(input): ApiJson<DirectMessageInput>,
) -> Result<(StatusCode, Json<direct_message::Model>), JsonApiError> {
    let m = message_service::send_direct_message(&state.db, current.id(), current.role(), input).await?;
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(patch, path = "/api/inbox/{id}/read", tag = "inbox", params(("id" = i32, Path, description = "Message id")), responses((status = 204, description = "Marked read"), (status = 403, description = "Not the recipient"), (status = 404, description = "Not Found")))]
pub async fn mark_read(State(state): State<ServerState>, current: CurrentUser, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    message_service::mark_direct_read(&state.db, current.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
