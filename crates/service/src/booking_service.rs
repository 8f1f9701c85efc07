//! Course/service booking requests from the public site.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::{booking, course, notification, service_offering, user, validate, BookingStatus, NotificationKind};

use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct BookingInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub course_id: Option<i32>,
    #[serde(default)]
    pub service_id: Option<i32>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create_booking<C: ConnectionTrait>(db: &C, input: BookingInput) -> Result<booking::Model, ServiceError> {
    let name = user::validate_name(&input.name)?;
    let email = user::validate_email(&input.email)?;
    if let Some(cid) = input.course_id {
        if course::Entity::find_by_id(cid).one(db).await?.is_none() {
            return Err(ServiceError::validation(format!("course {cid} does not exist")));
        }
    }
    if let Some(sid) = input.service_id {
        if service_offering::Entity::find_by_id(sid).one(db).await?.is_none() {
            return Err(ServiceError::validation(format!("service {sid} does not exist")));
        }
    }
    let now = Utc::now().into();
    let am = booking::ActiveModel {
        name: Set(name),
        email: Set(email),
        phone: Set(validate::optional_text("phone", input.phone.as_deref(), 32)?),
        course_id: Set(input.course_id),
        service_id: Set(input.service_id),
        preferred_time: Set(validate::optional_text("preferred_time", input.preferred_time.as_deref(), 128)?),
        message: Set(validate::optional_text("message", input.message.as_deref(), 4000)?),
        status: Set(BookingStatus::Pending.into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, "created booking");
    Ok(m)
}

/// Newest first, optionally filtered by status.
pub async fn list_bookings<C: ConnectionTrait>(
    db: &C,
    status: Option<BookingStatus>,
    opts: Pagination,
) -> Result<Paged<booking::Model>, ServiceError> {
    let mut q = booking::Entity::find();
    if let Some(s) = status {
        q = q.filter(booking::Column::Status.eq(s.as_str()));
    }
    let q = q.order_by_desc(booking::Column::CreatedAt).order_by_desc(booking::Column::Id);
    fetch_page(db, q, opts).await
}

pub async fn get_booking<C: ConnectionTrait>(db: &C, id: i32) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("booking"))
}

/// Set a booking's status with one `UPDATE`. Any status may follow any
/// other. Confirming notifies the matching user account, if there is one.
#[instrument(skip(db))]
pub async fn update_status<C: ConnectionTrait>(db: &C, id: i32, status: &str) -> Result<booking::Model, ServiceError> {
    let status: BookingStatus = status.parse()?;
    let res = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(status.as_str()))
        .col_expr(booking::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(booking::Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("booking"));
    }
    let m = get_booking(db, id).await?;
    info!(id = %m.id, status = %status, "booking status changed");

    if status == BookingStatus::Confirmed {
        if let Some(u) = user::find_by_email(db, &m.email).await? {
            notification::push(
                db,
                u.id,
                NotificationKind::Info,
                "Booking confirmed",
                &format!("Your booking #{} has been confirmed. We will contact you shortly.", m.id),
            )
            .await?;
        }
    }
    Ok(m)
}

pub async fn delete_booking<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = booking::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_course, seed_user};
    use models::Role;

    fn input(email: &str) -> BookingInput {
        BookingInput {
            name: "Usman".into(),
            email: email.into(),
            phone: None,
            course_id: None,
            service_id: None,
            preferred_time: Some("evenings".into()),
            message: None,
        }
    }

    #[tokio::test]
    async fn create_starts_pending_and_checks_refs() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed_course(&db, "Nazra", true).await?;
        let mut i = input("usman@example.com");
        i.course_id = Some(c.id);
        let b = create_booking(&db, i).await?;
        assert_eq!(b.status, "pending");

        let mut bad = input("usman@example.com");
        bad.course_id = Some(9999);
        assert!(matches!(create_booking(&db, bad).await, Err(ServiceError::Validation(_))));
        assert!(matches!(create_booking(&db, input("nope")).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn status_update_persists() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let b = create_booking(&db, input("usman@example.com")).await?;
        update_status(&db, b.id, "cancelled").await?;
        assert_eq!(get_booking(&db, b.id).await?.status, "cancelled");
        // no transition rules
        update_status(&db, b.id, "pending").await?;
        assert!(matches!(update_status(&db, b.id, "archived").await, Err(ServiceError::Validation(_))));
        assert!(matches!(update_status(&db, 4242, "confirmed").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn confirm_notifies_matching_account() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_user(&db, "usman@example.com", Role::Student).await?;
        let b = create_booking(&db, input("USMAN@example.com")).await?;
        update_status(&db, b.id, "confirmed").await?;
        let notes = notification::Entity::find()
            .filter(notification::Column::UserId.eq(u.id))
            .all(&db)
            .await?;
        assert_eq!(notes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_pages() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for n in 0..5 {
            let b = create_booking(&db, input(&format!("s{n}@example.com"))).await?;
            if n % 2 == 0 {
                update_status(&db, b.id, "confirmed").await?;
            }
        }
        let page = list_bookings(&db, Some(BookingStatus::Confirmed), Pagination { page: 1, per_page: 2 }).await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        let all = list_bookings(&db, None, Pagination::default()).await?;
        assert_eq!(all.total, 5);
        assert!(all.items[0].id > all.items[4].id);
        Ok(())
    }
}
