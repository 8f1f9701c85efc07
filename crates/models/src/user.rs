use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::enums::{Role, UserStatus};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn role(&self) -> Result<Role, ModelError> { self.role.parse() }

    pub fn is_active(&self) -> bool { self.status == UserStatus::Active.as_str() }
}

/// Lowercased, trimmed email with a minimal shape check.
pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.len() > 255 || email.contains(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(email)
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    crate::validate::required_text("name", name, 128)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    name: &str,
    phone: Option<&str>,
    role: Role,
) -> Result<Model, ModelError> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;
    let phone = crate::validate::optional_text("phone", phone, 32)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        email: Set(email),
        name: Set(name),
        phone: Set(phone),
        role: Set(role.into()),
        status: Set(UserStatus::Active.into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    let email = email.trim().to_ascii_lowercase();
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(validate_email("  Aisha@Example.COM ").unwrap(), "aisha@example.com");
    }

    #[test]
    fn bad_emails_rejected() {
        for bad in ["", "no-at-sign", "@example.com", "a@nodot", "a b@example.com", "a@.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
