use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::Role;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::{AuthRepository, NewUser};

pub const PASSWORD_ALGORITHM: &str = "argon2";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, session_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), session_ttl_hours, password_algorithm: PASSWORD_ALGORITHM.into() }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self { Self::new(c.jwt_secret.clone(), c.session_ttl_hours) }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let n = password.chars().count();
    if n < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    if n > 128 {
        return Err(AuthError::Validation("password too long (<=128)".into()));
    }
    Ok(())
}

/// Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, phc: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new student with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("doc-secret-0123456789", 12));
    /// let input = RegisterInput { email: "Student@Example.com".into(), name: "Amina".into(), password: "Secret123".into(), phone: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "student@example.com");
    /// assert_eq!(user.role, models::Role::Student);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        self.create_account(&input.email, &input.name, input.phone.as_deref(), &input.password, Role::Student).await
    }

    /// Create an account with any role. Used by admin user management and
    /// the startup admin bootstrap.
    #[instrument(skip(self, password), fields(email = %email, role = %role))]
    pub async fn create_account(
        &self,
        email: &str,
        name: &str,
        phone: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        validate_password(password)?;
        let email = models::user::validate_email(email)?;
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(password)?;
        let new = NewUser { email: &email, name, phone, role };
        let user = self.repo.create_user_with_password(new, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("doc-secret-0123456789", 12));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into(), phone: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(svc.verify_token(&session.token).unwrap().uid, session.user.id);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &cred.password_hash)? {
            warn!(user_id = %user.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }
        if user.status != models::UserStatus::Active {
            warn!(user_id = %user.id, "login_disabled_account");
            return Err(AuthError::Disabled);
        }

        let (token, expires_at) = self.issue_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token, expires_at })
    }

    /// HS256 token carrying uid, role, exp and a random jti.
    pub fn issue_token(&self, user: &AuthUser) -> Result<(String, i64), AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.session_ttl_hours)).timestamp();
        let claims = Claims { uid: user.id, role: user.role, exp: exp as usize, jti: uuid::Uuid::new_v4().to_string() };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, exp))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();
        decode::<Claims>(token, &key, &validation)
            .map(|d| d.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve a session token to the current user. The role is re-read from
    /// storage so role changes and disabling take effect immediately.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        let user = self.repo.find_user_by_id(claims.uid).await?.ok_or(AuthError::Unauthorized)?;
        if user.status != models::UserStatus::Active {
            return Err(AuthError::Disabled);
        }
        Ok(user)
    }

    #[instrument(skip(self, input))]
    pub async fn change_password(&self, user_id: i32, input: ChangePasswordInput) -> Result<(), AuthError> {
        let cred = self.repo.get_credentials(user_id).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.current_password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        self.set_password(user_id, &input.new_password).await
    }

    /// Replace a user's password without checking the old one.
    pub async fn set_password(&self, user_id: i32, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let hash = hash_password(password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    /// Create the first admin account when none exists yet.
    pub async fn ensure_admin(&self, email: &str, password: &str, name: &str) -> Result<Option<AuthUser>, AuthError> {
        if self.repo.has_admin().await? {
            debug!("admin account present; bootstrap skipped");
            return Ok(None);
        }
        let admin = self.create_account(email, name, None, password, Role::Admin).await?;
        info!(user_id = %admin.id, email = %admin.email, "admin_bootstrapped");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use models::UserStatus;

    fn svc() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        (repo.clone(), AuthService::new(repo, AuthConfig::new("unit-test-secret-0123", 12)))
    }

    fn reg(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Yusuf".into(), password: password.into(), phone: None }
    }

    #[tokio::test]
    async fn register_validates_and_rejects_duplicates() {
        let (_, svc) = svc();
        assert!(matches!(svc.register(reg("y@example.com", "short")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(reg("not-an-email", "longenough")).await, Err(AuthError::Validation(_))));
        svc.register(reg("y@example.com", "longenough")).await.unwrap();
        assert!(matches!(svc.register(reg("Y@Example.com", "longenough")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_disabled_users() {
        let (repo, svc) = svc();
        let u = svc.register(reg("y@example.com", "longenough")).await.unwrap();
        let bad = LoginInput { email: "y@example.com".into(), password: "wrongpass".into() };
        assert!(matches!(svc.login(bad).await, Err(AuthError::Unauthorized)));

        repo.set_status(u.id, UserStatus::Disabled);
        let good = LoginInput { email: "y@example.com".into(), password: "longenough".into() };
        assert!(matches!(svc.login(good).await, Err(AuthError::Disabled)));
    }

    #[tokio::test]
    async fn tokens_round_trip_and_reject_tampering() {
        let (_, svc) = svc();
        let u = svc.register(reg("y@example.com", "longenough")).await.unwrap();
        let (token, _) = svc.issue_token(&u).unwrap();
        let me = svc.authenticate(&token).await.unwrap();
        assert_eq!(me.id, u.id);

        let other = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new("another-secret-987654", 12));
        assert!(other.verify_token(&token).is_err());
        assert!(svc.verify_token("not.a.token").is_err());
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo, AuthConfig::new("unit-test-secret-0123", -1));
        let u = svc.register(reg("y@example.com", "longenough")).await.unwrap();
        let (token, _) = svc.issue_token(&u).unwrap();
        assert!(matches!(svc.verify_token(&token), Err(AuthError::TokenError(_))));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let (_, svc) = svc();
        let u = svc.register(reg("y@example.com", "longenough")).await.unwrap();
        let wrong = ChangePasswordInput { current_password: "nope-nope".into(), new_password: "brandnew1".into() };
        assert!(matches!(svc.change_password(u.id, wrong).await, Err(AuthError::Unauthorized)));

        let ok = ChangePasswordInput { current_password: "longenough".into(), new_password: "brandnew1".into() };
        svc.change_password(u.id, ok).await.unwrap();
        let login = LoginInput { email: "y@example.com".into(), password: "brandnew1".into() };
        assert!(svc.login(login).await.is_ok());
    }

    #[tokio::test]
    async fn ensure_admin_runs_once() {
        let (_, svc) = svc();
        let first = svc.ensure_admin("admin@example.com", "adminpass1", "Admin").await.unwrap();
        assert_eq!(first.map(|a| a.role), Some(Role::Admin));
        let second = svc.ensure_admin("other@example.com", "adminpass1", "Admin").await.unwrap();
        assert!(second.is_none());
    }
}
