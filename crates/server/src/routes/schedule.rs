use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use models::class_session;
use service::schedule_service::{self, ScheduleEntry, ScheduleInput, SessionView, StudentSummary};

use crate::errors::{ApiJson, ApiPath, JsonApiError};
use crate::routes::auth::ServerState;
use crate::session::CurrentUser;

#[utoipa::path(post, path = "/api/admin/schedule", tag = "admin", request_body = crate::openapi::ScheduleRequest, responses((status = 201, description = "Class scheduled, both parties notified"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<ScheduleInput>,
) -> Result<(StatusCode, Json<class_session::Model>), JsonApiError> {
    let s = schedule_service::create_session(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(s)))
}

#[utoipa::path(get, path = "/api/admin/schedule", tag = "admin", responses((status = 200, description = "All sessions")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<SessionView>>, JsonApiError> {
    Ok(Json(schedule_service::list_sessions(&state.db).await?))
}

#[utoipa::path(delete, path = "/api/admin/schedule/{id}", tag = "admin", params(("id" = i32, Path, description = "Session id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !schedule_service::delete_session(&state.db, id).await? {
        return Err(JsonApiError::not_found("class session"));
    }
    info!(id = %id, "class session deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/schedule", tag = "schedule", responses((status = 200, description = "Caller's weekly sessions"), (status = 401, description = "Unauthorized")))]
pub async fn mine(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<Vec<ScheduleEntry>>, JsonApiError> {
    Ok(Json(schedule_service::my_schedule(&state.db, current.id()).await?))
}

#[utoipa::path(get, path = "/api/teacher/students", tag = "schedule", responses((status = 200, description = "Distinct students of the teacher"), (status = 403, description = "Not a teacher")))]
pub async fn teacher_students(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<Vec<StudentSummary>>, JsonApiError> {
    Ok(Json(schedule_service::teacher_students(&state.db, current.id()).await?))
}
