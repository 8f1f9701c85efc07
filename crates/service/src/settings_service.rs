//! Key/value site settings.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, ConnectionTrait, EntityTrait, Set, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};

use configs::AcademyConfig;
use models::setting;

use crate::errors::ServiceError;

pub async fn get_all<C: ConnectionTrait>(db: &C) -> Result<BTreeMap<String, String>, ServiceError> {
    let rows = setting::Entity::find().all(db).await?;
    Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
}

/// Upsert every pair in one transaction. Any invalid key rejects the whole
/// batch before anything is written.
#[instrument(skip(db, values), fields(count = values.len()))]
pub async fn upsert_many(db: &DatabaseConnection, values: BTreeMap<String, String>) -> Result<BTreeMap<String, String>, ServiceError> {
    for (k, v) in &values {
        setting::validate_key(k)?;
        if v.chars().count() > 10_000 {
            return Err(ServiceError::validation(format!("value for '{k}' too long")));
        }
    }
    let txn = db.begin().await?;
    let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
    for (k, v) in values {
        let am = setting::ActiveModel { key: Set(k), value: Set(v), updated_at: Set(now) };
        setting::Entity::insert(am)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_columns([setting::Column::Value, setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    let all = get_all(db).await?;
    info!(total = all.len(), "settings saved");
    Ok(all)
}

/// Academy details printed on challans: stored settings first, config as
/// fallback.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AcademyProfile {
    pub site_name: String,
    pub currency: String,
    pub bank_name: String,
    pub bank_account_title: String,
    pub bank_account_number: String,
}

pub async fn academy_profile<C: ConnectionTrait>(db: &C, fallback: &AcademyConfig) -> Result<AcademyProfile, ServiceError> {
    let stored = get_all(db).await?;
    let pick = |key: &str, default: &str| {
        stored
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    Ok(AcademyProfile {
        site_name: pick(setting::SITE_NAME, &fallback.name),
        currency: pick(setting::CURRENCY, &fallback.currency),
        bank_name: pick(setting::BANK_NAME, &fallback.bank_name),
        bank_account_title: pick(setting::BANK_ACCOUNT_TITLE, &fallback.bank_account_title),
        bank_account_number: pick(setting::BANK_ACCOUNT_NUMBER, &fallback.bank_account_number),
    })
}
