use axum::extract::State;
use axum::Json;

use service::stats::{self, DashboardStats};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/admin/stats", tag = "admin", responses((status = 200, description = "Counts for the admin dashboard"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<DashboardStats>, JsonApiError> {
    Ok(Json(stats::dashboard(&state.db).await?))
}
