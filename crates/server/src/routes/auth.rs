use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use configs::{AcademyConfig, AppConfig};
use models::user;
use service::auth::domain::{AuthUser, ChangePasswordInput, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::user_service;

use crate::errors::{ApiJson, JsonApiError};
use crate::session::{removal_cookie, session_cookie, CurrentUser};

/// Shared, immutable per-process state.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub academy: Arc<AcademyConfig>,
    pub cookie_secure: bool,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        let auth = Arc::new(AuthService::new(repo, AuthConfig::from(&cfg.auth)));
        Self { db, auth, academy: Arc::new(cfg.academy.clone()), cookie_secure: cfg.auth.cookie_secure }
    }
}

#[derive(Serialize)]
pub struct LoginOutput { pub user: AuthUser, pub token: String, pub expires_at: i64 }

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In, session cookie set"), (status = 401, description = "Unauthorized"), (status = 403, description = "Account Disabled")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone(), state.cookie_secure));
    Ok((jar, Json(LoginOutput { user: session.user, token: session.token, expires_at: session.expires_at })))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Session cookie removed")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(removal_cookie());
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> Result<Json<user::Model>, JsonApiError> {
    let u = user_service::get_user(&state.db, current.id()).await?;
    Ok(Json(u))
}

#[utoipa::path(post, path = "/api/auth/password", tag = "auth", request_body = crate::openapi::ChangePasswordRequest, responses((status = 204, description = "Password changed"), (status = 400, description = "Bad Request"), (status = 401, description = "Wrong current password")))]
pub async fn change_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(input): ApiJson<ChangePasswordInput>,
) -> Result<StatusCode, JsonApiError> {
    state.auth.change_password(current.id(), input).await?;
    Ok(StatusCode::NO_CONTENT)
}
