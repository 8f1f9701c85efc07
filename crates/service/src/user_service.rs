//! Admin user management.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::{user, validate, Role, UserStatus};

use crate::auth::service::{hash_password, validate_password, PASSWORD_ALGORITHM};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub phone: Option<String>,
}

/// Create a user with credentials in one go.
#[instrument(skip(db, input), fields(email = %input.email, role = %input.role))]
pub async fn create_user(db: &DatabaseConnection, input: CreateUserInput) -> Result<user::Model, ServiceError> {
    use sea_orm::TransactionTrait;

    validate_password(&input.password)?;
    user::validate_name(&input.name)?;
    user::validate_email(&input.email)?;
    validate::optional_text("phone", input.phone.as_deref(), 32)?;
    if user::find_by_email(db, &input.email).await?.is_some() {
        return Err(ServiceError::Conflict("user already exists".into()));
    }
    let hash = hash_password(&input.password)?;
    let txn = db.begin().await?;
    let created = user::create(&txn, &input.email, &input.name, input.phone.as_deref(), input.role).await?;
    models::user_credentials::upsert_password(&txn, created.id, hash, PASSWORD_ALGORITHM).await?;
    txn.commit().await?;
    info!(id = %created.id, "created user");
    Ok(created)
}

/// Get a user by id.
pub async fn get_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))
}

/// List users, optionally by role, newest first.
pub async fn list_users<C: ConnectionTrait>(db: &C, role: Option<Role>, opts: Pagination) -> Result<Paged<user::Model>, ServiceError> {
    let mut q = user::Entity::find();
    if let Some(r) = role {
        q = q.filter(user::Column::Role.eq(r.as_str()));
    }
    fetch_page(db, q.order_by_desc(user::Column::Id), opts).await
}

pub async fn update_user<C: ConnectionTrait>(db: &C, id: i32, input: UpdateUserInput) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = get_user(db, id).await?.into();
    if let Some(n) = input.name.as_deref() {
        am.name = Set(user::validate_name(n)?);
    }
    if let Some(r) = input.role {
        am.role = Set(r.into());
    }
    if let Some(s) = input.status {
        am.status = Set(s.into());
    }
    if input.phone.is_some() {
        am.phone = Set(validate::optional_text("phone", input.phone.as_deref(), 32)?);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(id = %updated.id, role = %updated.role, status = %updated.status, "updated user");
    Ok(updated)
}

/// Hard-delete a user (removes record and, through FKs, their data).
pub async fn delete_user<C: ConnectionTrait>(db: &C, acting_admin: i32, id: i32) -> Result<bool, ServiceError> {
    if acting_admin == id {
        return Err(ServiceError::validation("you cannot delete your own account"));
    }
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(id = %id, "deleted user");
    }
    Ok(res.rows_affected > 0)
}

/// Fail unless `id` names an existing user with `role`.
pub async fn require_role<C: ConnectionTrait>(db: &C, id: i32, role: Role, field: &str) -> Result<user::Model, ServiceError> {
    let u = user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::validation(format!("{field} {id} does not exist")))?;
    if u.role != role.as_str() {
        return Err(ServiceError::validation(format!("{field} {id} is not a {role}")));
    }
    Ok(u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn input(email: &str, role: Role) -> CreateUserInput {
        CreateUserInput { email: email.into(), name: "Imran".into(), role, password: "teacherpass".into(), phone: None }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create_user(&db, input("imran@example.com", Role::Teacher)).await?;
        assert_eq!(t.role, "teacher");
        assert!(models::user_credentials::find_by_user(&db, t.id).await?.is_some());
        assert!(matches!(create_user(&db, input("imran@example.com", Role::Teacher)).await, Err(ServiceError::Conflict(_))));

        let mut short = input("x@example.com", Role::Student);
        short.password = "123".into();
        assert!(matches!(create_user(&db, short).await, Err(ServiceError::Validation(_))));

        let updated = update_user(&db, t.id, UpdateUserInput { status: Some(UserStatus::Disabled), ..Default::default() }).await?;
        assert_eq!(updated.status, "disabled");

        create_user(&db, input("s@example.com", Role::Student)).await?;
        let teachers = list_users(&db, Some(Role::Teacher), Pagination::default()).await?;
        assert_eq!(teachers.total, 1);

        assert!(matches!(delete_user(&db, t.id, t.id).await, Err(ServiceError::Validation(_))));
        assert!(delete_user(&db, 0, t.id).await?);
        assert!(matches!(get_user(&db, t.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn require_role_checks_role() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = create_user(&db, input("s@example.com", Role::Student)).await?;
        assert!(require_role(&db, s.id, Role::Student, "student_id").await.is_ok());
        assert!(matches!(require_role(&db, s.id, Role::Teacher, "teacher_id").await, Err(ServiceError::Validation(_))));
        assert!(matches!(require_role(&db, 77, Role::Student, "student_id").await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
