//! Fee plans, payments, challans and the student account book.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use service::fees::{self, challan, ledger::AccountBook, CreatePlanInput, FeeOverview, PaymentInput, PaymentReceipt, PlanView};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::routes::auth::ServerState;
use crate::session::CurrentUser;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct StudentQuery {
    /// Admins only; students always see their own records
    pub student_id: Option<i32>,
}

/// Students are pinned to themselves; admins may look at anyone.
fn target_student(current: &CurrentUser, requested: Option<i32>) -> Result<i32, JsonApiError> {
    match requested {
        Some(id) if id != current.id() && !current.is_admin() => Err(JsonApiError::forbidden("not your fee records")),
        Some(id) => Ok(id),
        None => Ok(current.id()),
    }
}

#[utoipa::path(post, path = "/api/admin/fee-plans", tag = "admin", request_body = crate::openapi::FeePlanRequest, responses((status = 201, description = "Plan with generated installments"), (status = 400, description = "Bad Request")))]
pub async fn create_plan(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CreatePlanInput>,
) -> Result<(StatusCode, Json<PlanView>), JsonApiError> {
    let plan = fees::create_plan(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(get, path = "/api/admin/fee-plans", tag = "admin", params(StudentQuery), responses((status = 200, description = "Plans, newest first")))]
pub async fn list_plans(State(state): State<ServerState>, ApiQuery(q): ApiQuery<StudentQuery>) -> Result<Json<Vec<PlanView>>, JsonApiError> {
    Ok(Json(fees::list_plans(&state.db, q.student_id).await?))
}

#[utoipa::path(delete, path = "/api/admin/fee-plans/{id}", tag = "admin", params(("id" = i32, Path, description = "Fee plan id")), responses((status = 204, description = "Deleted with installments and payments"), (status = 404, description = "Not Found")))]
pub async fn delete_plan(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    if !fees::delete_plan(&state.db, id).await? {
        return Err(JsonApiError::not_found("fee plan"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/admin/installments/{id}/payments", tag = "admin", params(("id" = i32, Path, description = "Installment id")), request_body = crate::openapi::PaymentRequest, responses((status = 201, description = "Payment recorded"), (status = 400, description = "Amount not positive or above outstanding"), (status = 404, description = "Not Found")))]
pub async fn record_payment(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<PaymentInput>,
) -> Result<(StatusCode, Json<PaymentReceipt>), JsonApiError> {
    let receipt = fees::record_payment(&state.db, id, Some(current.id()), input).await?;
    info!(installment_id = %id, by = %current.id(), "payment accepted");
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(get, path = "/api/fees", tag = "fees", params(StudentQuery), responses((status = 200, description = "Plans with installments and progress"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn my_fees(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiQuery(q): ApiQuery<StudentQuery>,
) -> Result<Json<FeeOverview>, JsonApiError> {
    let student_id = target_student(&current, q.student_id)?;
    Ok(Json(fees::student_overview(&state.db, student_id).await?))
}

#[utoipa::path(get, path = "/api/account-book", tag = "fees", params(StudentQuery), responses((status = 200, description = "Debits and credits with running balance"), (status = 401, description = "Unauthorized")))]
pub async fn account_book(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiQuery(q): ApiQuery<StudentQuery>,
) -> Result<Json<AccountBook>, JsonApiError> {
    let student_id = target_student(&current, q.student_id)?;
    Ok(Json(fees::account_book(&state.db, student_id).await?))
}

#[utoipa::path(get, path = "/api/installments/{id}/challan", tag = "fees", params(("id" = i32, Path, description = "Installment id")), responses((status = 200, description = "Printable challan", content_type = "text/html"), (status = 403, description = "Not your installment"), (status = 404, description = "Not Found")))]
pub async fn challan(State(state): State<ServerState>, current: CurrentUser, ApiPath(id): ApiPath<i32>) -> Result<Html<String>, JsonApiError> {
    let c = fees::challan_for(&state.db, id, current.id(), current.is_admin(), &state.academy).await?;
    Ok(Html(challan::render(&c)))
}
