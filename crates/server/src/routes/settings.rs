use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use service::settings_service;

use crate::errors::{ApiJson, JsonApiError};
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/settings", tag = "settings", responses((status = 200, description = "Key/value map")))]
pub async fn get_all(State(state): State<ServerState>) -> Result<Json<BTreeMap<String, String>>, JsonApiError> {
    Ok(Json(settings_service::get_all(&state.db).await?))
}

#[utoipa::path(put, path = "/api/admin/settings", tag = "admin", request_body = crate::openapi::SettingsRequest, responses((status = 200, description = "Saved"), (status = 400, description = "Invalid key")))]
pub async fn put_many(
    State(state): State<ServerState>,
    ApiJson(values): ApiJson<BTreeMap<String, String>>,
) -> Result<Json<BTreeMap<String, String>>, JsonApiError> {
    Ok(Json(settings_service::upsert_many(&state.db, values).await?))
}
