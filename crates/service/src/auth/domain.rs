use models::{Role, UserStatus};
use serde::{Deserialize, Serialize};

/// Registration input. Self-registered accounts are always students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: i32,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// JWT claims carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i32,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
