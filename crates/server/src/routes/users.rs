use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use models::{user, Role};
use service::pagination::{Paged, Pagination};
use service::user_service::{self, CreateUserInput, UpdateUserInput};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::routes::auth::ServerState;
use crate::routes::parse_filter;
use crate::session::CurrentUser;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UserQuery {
    /// student, teacher or admin
    pub role: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/api/admin/users", tag = "admin", params(UserQuery), responses((status = 200, description = "Page of users"), (status = 400, description = "Unknown role")))]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<UserQuery>) -> Result<Json<Paged<user::Model>>, JsonApiError> {
    let role = parse_filter::<Role>(q.role.as_deref())?;
    Ok(Json(user_service::list_users(&state.db, role, Pagination::from_query(q.page, q.per_page)).await?))
}

#[utoipa::path(post, path = "/api/admin/users", tag = "admin", request_body = crate::openapi::CreateUserRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Email taken")))]
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    let u = user_service::create_user(&state.db, input).await?;
    info!(id = %u.id, by = %current.id(), "admin created user");
    Ok((StatusCode::CREATED, Json(u)))
}

#[utoipa::path(get, path = "/api/admin/users/{id}", tag = "admin", params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "User"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/admin/users/{id}", tag = "admin", params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::UpdateUserRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::update_user(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/admin/users/{id}", tag = "admin", params(("id" = i32, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 400, description = "Cannot delete yourself"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, current: CurrentUser, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !user_service::delete_user(&state.db, current.id(), id).await? {
        return Err(JsonApiError::not_found("user"));
    }
    Ok(StatusCode::NO_CONTENT)
}
