use async_trait::async_trait;
use models::Role;

use super::domain::{AuthUser, Credentials};

/// Profile fields for a new account.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError>;
    /// Insert the user and its password hash together; a taken email is
    /// `AuthError::Conflict`.
    async fn create_user_with_password(
        &self,
        user: NewUser<'_>,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError>;
    async fn has_admin(&self) -> Result<bool, AuthError>;

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use models::UserStatus;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<i32, Credentials>>, // key: user_id
    }

    impl MockAuthRepository {
        /// Flip a stored user's status.
        pub fn set_status(&self, user_id: i32, status: UserStatus) {
            if let Ok(mut users) = self.users.lock() {
                if let Some(u) = users.values_mut().find(|u| u.id == user_id) {
                    u.status = status;
                }
            }
        }
    }

    fn poisoned<T>(_: T) -> AuthError { AuthError::Repository("mock lock poisoned".into()) }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.get(&email.trim().to_ascii_lowercase()).cloned())
        }

        async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn create_user_with_password(
            &self,
            new: NewUser<'_>,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<AuthUser, AuthError> {
            let email = models::user::validate_email(new.email)?;
            let name = models::user::validate_name(new.name)?;
            let mut users = self.users.lock().map_err(poisoned)?;
            let mut creds = self.creds.lock().map_err(poisoned)?;
            if users.contains_key(&email) {
                return Err(AuthError::Conflict);
            }
            let id = users.len() as i32 + 1;
            let user = AuthUser { id, email: email.clone(), name, role: new.role, status: UserStatus::Active };
            users.insert(email, user.clone());
            creds.insert(id, Credentials { user_id: id, password_hash, password_algorithm });
            Ok(user)
        }

        async fn has_admin(&self) -> Result<bool, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().any(|u| u.role == Role::Admin))
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }
    }
}
