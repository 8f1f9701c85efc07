use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use super::setup_test_db;
use crate::{booking, course, notification, setting, user, user_credentials, BookingStatus, NotificationKind, Role};

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let created = user::create(&db, "Bilal@Example.com", "Bilal", Some(" 0300 "), Role::Student).await?;
    assert_eq!(created.email, "bilal@example.com");
    assert_eq!(created.phone.as_deref(), Some("0300"));
    assert_eq!(created.role()?, Role::Student);
    assert!(created.is_active());

    let found = user::find_by_email(&db, "BILAL@example.com").await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    // unique email
    assert!(user::create(&db, "bilal@example.com", "Other", None, Role::Teacher).await.is_err());

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(user::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_credentials_upsert() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "hafsa@example.com", "Hafsa", None, Role::Teacher).await?;

    let first = user_credentials::upsert_password(&db, u.id, "$argon2id$first".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "$argon2id$second".into(), "argon2").await?;
    assert_eq!(first.id, second.id);

    let stored = user_credentials::find_by_user(&db, u.id).await?.expect("credentials");
    assert_eq!(stored.password_hash, "$argon2id$second");
    assert!(user_credentials::upsert_password(&db, u.id, "  ".into(), "argon2").await.is_err());

    // hash never leaves through serde
    let json = serde_json::to_value(&stored)?;
    assert!(json.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn test_booking_status_column() -> Result<()> {
    let db = setup_test_db().await?;
    let now = Utc::now();
    let c = course::ActiveModel {
        title: Set("Tajweed".into()),
        slug: Set("tajweed".into()),
        description: Set(String::new()),
        duration_weeks: Set(12),
        monthly_fee: Set(3000),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let b = booking::ActiveModel {
        name: Set("Zaid".into()),
        email: Set("zaid@example.com".into()),
        course_id: Set(Some(c.id)),
        status: Set(BookingStatus::Pending.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert_eq!(b.status()?, BookingStatus::Pending);

    let mut am: booking::ActiveModel = b.into();
    am.status = Set(BookingStatus::Cancelled.into());
    let updated = am.update(&db).await?;
    let reloaded = booking::Entity::find_by_id(updated.id).one(&db).await?.expect("booking");
    assert_eq!(reloaded.status()?, BookingStatus::Cancelled);
    Ok(())
}

#[tokio::test]
async fn test_setting_primary_key_is_the_key() -> Result<()> {
    let db = setup_test_db().await?;
    setting::ActiveModel {
        key: Set(setting::SITE_NAME.into()),
        value: Set("Al-Noor".into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;
    let row = setting::Entity::find_by_id(setting::SITE_NAME.to_string()).one(&db).await?;
    assert_eq!(row.map(|r| r.value), Some("Al-Noor".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_notification_push() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "maryam@example.com", "Maryam", None, Role::Student).await?;
    let n = notification::push(&db, u.id, NotificationKind::Fee, "Payment received", "PKR 3000").await?;
    assert!(!n.is_read);
    assert_eq!(n.kind, "fee");
    assert!(notification::push(&db, u.id, NotificationKind::Info, " ", "x").await.is_err());

    let unread = notification::Entity::find()
        .filter(notification::Column::UserId.eq(u.id))
        .filter(notification::Column::IsRead.eq(false))
        .count(&db)
        .await?;
    assert_eq!(unread, 1);
    Ok(())
}
