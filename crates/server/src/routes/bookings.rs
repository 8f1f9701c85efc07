use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use models::{booking, BookingStatus};
use service::booking_service::{self, BookingInput};
use service::pagination::{Paged, Pagination};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::routes::auth::ServerState;
use crate::routes::parse_filter;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookingQuery {
    /// pending, confirmed, completed or cancelled
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::BookingRequest, responses((status = 201, description = "Booking received"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<BookingInput>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    let b = booking_service::create_booking(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(b)))
}

#[utoipa::path(get, path = "/api/admin/bookings", tag = "admin", params(BookingQuery), responses((status = 200, description = "Page of bookings"), (status = 400, description = "Unknown status")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<BookingQuery>,
) -> Result<Json<Paged<booking::Model>>, JsonApiError> {
    let status = parse_filter::<BookingStatus>(q.status.as_deref())?;
    let page = booking_service::list_bookings(&state.db, status, Pagination::from_query(q.page, q.per_page)).await?;
    Ok(Json(page))
}

#[utoipa::path(put, path = "/api/admin/bookings/{id}", tag = "admin", params(("id" = i32, Path, description = "Booking id")), request_body = crate::openapi::StatusRequest, responses((status = 200, description = "Status changed"), (status = 400, description = "Unknown status"), (status = 404, description = "Not Found")))]
pub async fn update_status(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<booking::Model>, JsonApiError> {
    let b = booking_service::update_status(&state.db, id, &body.status).await?;
    Ok(Json(b))
}

#[utoipa::path(delete, path = "/api/admin/bookings/{id}", tag = "admin", params(("id" = i32, Path, description = "Booking id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !booking_service::delete_booking(&state.db, id).await? {
        return Err(JsonApiError::not_found("booking"));
    }
    info!(id = %id, "booking deleted");
    Ok(StatusCode::NO_CONTENT)
}
