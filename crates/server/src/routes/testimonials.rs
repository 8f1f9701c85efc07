use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use models::testimonial;
use service::testimonial_service::{self, TestimonialInput, TestimonialUpdate};

use crate::errors::{ApiJson, ApiPath, JsonApiError};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/testimonials", tag = "testimonials", responses((status = 200, description = "Approved testimonials, newest first")))]
pub async fn public_list(State(state): State<ServerState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(testimonial_service::list(&state.db, true).await?))
}

#[utoipa::path(post, path = "/api/testimonials", tag = "testimonials", request_body = crate::openapi::TestimonialRequest, responses((status = 201, description = "Submitted for approval"), (status = 400, description = "Bad Request")))]
pub async fn submit(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<TestimonialInput>,
) -> Result<(StatusCode, Json<testimonial::Model>), JsonApiError> {
    let t = testimonial_service::submit(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(t)))
}

#[utoipa::path(get, path = "/api/admin/testimonials", tag = "admin", responses((status = 200, description = "All testimonials")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(testimonial_service::list(&state.db, false).await?))
}

#[utoipa::path(put, path = "/api/admin/testimonials/{id}", tag = "admin", params(("id" = i32, Path, description = "Testimonial id")), request_body = crate::openapi::TestimonialUpdateRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<TestimonialUpdate>,
) -> Result<Json<testimonial::Model>, JsonApiError> {
    let t = testimonial_service::update(&state.db, id, input).await?;
    Ok(Json(t))
}

#[utoipa::path(delete, path = "/api/admin/testimonials/{id}", tag = "admin", params(("id" = i32, Path, description = "Testimonial id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !testimonial_service::delete(&state.db, id).await? {
        return Err(JsonApiError::not_found("testimonial"));
    }
    Ok(StatusCode::NO_CONTENT)
}
