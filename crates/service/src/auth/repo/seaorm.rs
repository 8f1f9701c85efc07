use models::{user, user_credentials, Role, UserStatus};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::{AuthRepository, NewUser};

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: sea_orm::DbErr) -> AuthError { AuthError::Repository(e.to_string()) }

/// Map a stored row to the auth view. Unknown role/status strings are
/// treated as a disabled student so they can never grant access.
pub(crate) fn to_auth_user(u: user::Model) -> AuthUser {
    let role = u.role().unwrap_or(Role::Student);
    let status = u.status.parse().unwrap_or(UserStatus::Disabled);
    AuthUser { id: u.id, email: u.email, name: u.name, role, status }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email).await?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find_by_id(id).one(&self.db).await.map_err(repo_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user_with_password(
        &self,
        new: NewUser<'_>,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let created = match user::create(&txn, new.email, new.name, new.phone, new.role).await {
            Ok(u) => u,
            Err(e) => {
                txn.rollback().await.map_err(repo_err)?;
                return Err(e.into());
            }
        };
        if let Err(e) = user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await {
            txn.rollback().await.map_err(repo_err)?;
            return Err(e.into());
        }
        txn.commit().await.map_err(repo_err)?;
        Ok(to_auth_user(created))
    }

    async fn has_admin(&self) -> Result<bool, AuthError> {
        let n = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin.as_str()))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(n > 0)
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }
}
