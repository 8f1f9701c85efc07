use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "setting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const SITE_NAME: &str = "site_name";
pub const CURRENCY: &str = "currency";
pub const BANK_NAME: &str = "bank_name";
pub const BANK_ACCOUNT_TITLE: &str = "bank_account_title";
pub const BANK_ACCOUNT_NUMBER: &str = "bank_account_number";

/// Keys are `[a-z0-9_.]{1,64}`.
pub fn validate_key(key: &str) -> Result<(), ModelError> {
    let ok = !key.is_empty()
        && key.len() <= 64
        && key.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'.');
    if !ok {
        return Err(ModelError::Validation(format!("invalid setting key '{key}'")));
    }
    Ok(())
}
