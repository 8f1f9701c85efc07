use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(m) => Self::Validation(m),
            ModelError::Conflict(m) => Self::Conflict(m),
            ModelError::Db(m) => Self::Db(m),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<crate::auth::errors::AuthError> for ServiceError {
    fn from(e: crate::auth::errors::AuthError) -> Self {
        use crate::auth::errors::AuthError;
        match e {
            AuthError::Validation(m) => Self::Validation(m),
            AuthError::Conflict => Self::Conflict("user already exists".into()),
            AuthError::NotFound => Self::not_found("user"),
            AuthError::Repository(m) => Self::Db(m),
            other => Self::Internal(other.to_string()),
        }
    }
}
