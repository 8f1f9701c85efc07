//! Session cookie / bearer token authentication and role guards.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::Role;
use service::auth::domain::AuthUser;
use tracing::{debug, warn};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated caller, placed in request extensions by
/// [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

impl CurrentUser {
    pub fn id(&self) -> i32 { self.0.id }

    pub fn role(&self) -> Role { self.0.role }

    pub fn is_admin(&self) -> bool { self.0.is_admin() }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(JsonApiError::unauthorized)
    }
}

/// Token from the `session` cookie, else from `Authorization: Bearer`.
fn extract_token(jar: &CookieJar, req: &Request) -> Option<String> {
    if let Some(c) = jar.get(SESSION_COOKIE) {
        if !c.value().is_empty() {
            return Some(c.value().to_string());
        }
    }
    let authz = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    authz.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Reject requests without a valid session with 401.
pub async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = extract_token(&jar, &req) else {
        debug!(path = %path, "missing session");
        return Err(JsonApiError::unauthorized());
    };
    let user = match state.auth.authenticate(&token).await {
        Ok(u) => u,
        Err(e) => {
            warn!(path = %path, err = %e, "session rejected");
            return Err(JsonApiError::unauthorized());
        }
    };
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

fn require(req: &Request, allowed: &[Role]) -> Result<(), JsonApiError> {
    let user = req.extensions().get::<CurrentUser>().ok_or_else(JsonApiError::unauthorized)?;
    if !allowed.contains(&user.role()) {
        warn!(user_id = %user.id(), role = %user.role(), path = %req.uri().path(), "role denied");
        return Err(JsonApiError::forbidden(format!("requires role: {}", allowed.iter().map(Role::as_str).collect::<Vec<_>>().join(" or "))));
    }
    Ok(())
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, JsonApiError> {
    require(&req, &[Role::Admin])?;
    Ok(next.run(req).await)
}

pub async fn require_teacher(req: Request, next: Next) -> Result<Response, JsonApiError> {
    require(&req, &[Role::Teacher, Role::Admin])?;
    Ok(next.run(req).await)
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut c = Cookie::from(SESSION_COOKIE);
    c.set_path("/");
    c
}
