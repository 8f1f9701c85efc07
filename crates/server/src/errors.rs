use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// JSON error body: `{"error": <short message>, "detail": <optional text>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    pub fn unauthorized() -> Self { Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None) }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(detail.into()))
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{what} not found")))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.error, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::bad_request(m),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(m)),
            ServiceError::Conflict(m) => Self::new(StatusCode::CONFLICT, "Conflict", Some(m)),
            ServiceError::Forbidden(m) => Self::forbidden(m),
            ServiceError::Db(_) | ServiceError::Internal(_) => {
                error!(err = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => Self::bad_request(m),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::NotFound => Self::not_found("user"),
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string())),
            AuthError::Disabled => Self::forbidden(e.to_string()),
            AuthError::TokenError(_) => Self::unauthorized(),
            AuthError::HashError(_) | AuthError::Repository(_) => {
                error!(err = %e, code = e.code(), "auth failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

/// `axum::Json` with rejections rendered as [`JsonApiError`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(ApiJson(v)),
            Err(rej) => Err(rejection(rej)),
        }
    }
}

fn rejection(rej: JsonRejection) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Body", Some(rej.body_text()))
}

/// `axum::extract::Path` with rejections rendered as [`JsonApiError`].
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(v)) => Ok(ApiPath(v)),
            Err(rej) => Err(path_rejection(rej)),
        }
    }
}

fn path_rejection(rej: PathRejection) -> JsonApiError {
    JsonApiError::new(rej.status(), "Invalid Path", Some(rej.body_text()))
}

/// `axum::extract::Query` with rejections rendered as [`JsonApiError`].
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(v)) => Ok(ApiQuery(v)),
            Err(rej) => Err(query_rejection(rej)),
        }
    }
}

fn query_rejection(rej: QueryRejection) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Query", Some(rej.body_text()))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::Db("secret sql".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (e, status) in cases {
            assert_eq!(JsonApiError::from(e).status, status);
        }
    }

    #[test]
    fn db_details_are_not_returned() {
        let e = JsonApiError::from(ServiceError::Db("relation \"user\" does not exist".into()));
        assert!(e.detail.is_none());
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Conflict).status, StatusCode::CONFLICT);
        assert_eq!(JsonApiError::from(AuthError::Disabled).status, StatusCode::FORBIDDEN);
        assert_eq!(JsonApiError::from(AuthError::TokenError("expired".into())).status, StatusCode::UNAUTHORIZED);
    }
}
