#![cfg(test)]
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use models::{course, user, Role};

/// Fresh in-memory database with all migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_memory().await?;
    models::db::migrate(&db).await?;
    Ok(db)
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, role: Role) -> Result<user::Model, anyhow::Error> {
    let name = email.split('@').next().unwrap_or("user");
    Ok(user::create(db, email, name, None, role).await?)
}

pub async fn seed_course(db: &DatabaseConnection, title: &str, active: bool) -> Result<course::Model, anyhow::Error> {
    let now = Utc::now();
    Ok(course::ActiveModel {
        title: Set(title.into()),
        slug: Set(course::slugify(title)?),
        description: Set(String::new()),
        duration_weeks: Set(12),
        monthly_fee: Set(2500),
        is_active: Set(active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}
