//! Courses and service offerings: public listings plus admin CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use models::{course, service_offering};
use service::catalog::{self, CourseInput, CourseUpdate, ServiceInput, ServiceUpdate};

use crate::errors::{ApiJson, ApiPath, JsonApiError};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/courses", tag = "catalog", responses((status = 200, description = "Active courses")))]
pub async fn public_courses(State(state): State<ServerState>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(catalog::list_courses(&state.db, true).await?))
}

#[utoipa::path(get, path = "/api/courses/{id}", tag = "catalog", params(("id" = i32, Path, description = "Course id")), responses((status = 200, description = "Course"), (status = 404, description = "Not Found")))]
pub async fn public_course(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<course::Model>, JsonApiError> {
    let c = catalog::get_course(&state.db, id).await?;
    if !c.is_active {
        return Err(JsonApiError::not_found("course"));
    }
    Ok(Json(c))
}

#[utoipa::path(get, path = "/api/services", tag = "catalog", responses((status = 200, description = "Active services by sort order")))]
pub async fn public_services(State(state): State<ServerState>) -> Result<Json<Vec<service_offering::Model>>, JsonApiError> {
    Ok(Json(catalog::list_services(&state.db, true).await?))
}

#[utoipa::path(get, path = "/api/admin/courses", tag = "admin", responses((status = 200, description = "All courses"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn list_courses(State(state): State<ServerState>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(catalog::list_courses(&state.db, false).await?))
}

#[utoipa::path(post, path = "/api/admin/courses", tag = "admin", request_body = crate::openapi::CourseRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Slug taken")))]
pub async fn create_course(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CourseInput>,
) -> Result<(StatusCode, Json<course::Model>), JsonApiError> {
    let c = catalog::create_course(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(c)))
}

#[utoipa::path(put, path = "/api/admin/courses/{id}", tag = "admin", params(("id" = i32, Path, description = "Course id")), request_body = crate::openapi::CourseUpdateRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update_course(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<CourseUpdate>,
) -> Result<Json<course::Model>, JsonApiError> {
    let c = catalog::update_course(&state.db, id, input).await?;
    Ok(Json(c))
}

#[utoipa::path(delete, path = "/api/admin/courses/{id}", tag = "admin", params(("id" = i32, Path, description = "Course id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_course(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !catalog::delete_course(&state.db, id).await? {
        return Err(JsonApiError::not_found("course"));
    }
    info!(id = %id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/services", tag = "admin", responses((status = 200, description = "All services")))]
pub async fn list_services(State(state): State<ServerState>) -> Result<Json<Vec<service_offering::Model>>, JsonApiError> {
    Ok(Json(catalog::list_services(&state.db, false).await?))
}

#[utoipa::path(post, path = "/api/admin/services", tag = "admin", request_body = crate::openapi::ServiceRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create_service(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<(StatusCode, Json<service_offering::Model>), JsonApiError> {
    let s = catalog::create_service(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(s)))
}

#[utoipa::path(put, path = "/api/admin/services/{id}", tag = "admin", params(("id" = i32, Path, description = "Service id")), request_body = crate::openapi::ServiceUpdateRequest, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_service(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ServiceUpdate>,
) -> Result<Json<service_offering::Model>, JsonApiError> {
    let s = catalog::update_service(&state.db, id, input).await?;
    Ok(Json(s))
}

#[utoipa::path(delete, path = "/api/admin/services/{id}", tag = "admin", params(("id" = i32, Path, description = "Service id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_service(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !catalog::delete_service(&state.db, id).await? {
        return Err(JsonApiError::not_found("service"));
    }
    info!(id = %id, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}
