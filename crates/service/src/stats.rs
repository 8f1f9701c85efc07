//! Admin dashboard counters.

use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use models::{booking, contact_message, course, user, BookingStatus, Role};

use crate::errors::ServiceError;
use crate::fees;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub bookings: BTreeMap<&'static str, u64>,
    pub unread_messages: u64,
    pub users: BTreeMap<&'static str, u64>,
    pub courses: u64,
    pub fees_billed: i64,
    pub fees_collected: i64,
}

pub async fn dashboard<C: ConnectionTrait>(db: &C) -> Result<DashboardStats, ServiceError> {
    let mut bookings = BTreeMap::new();
    for s in BookingStatus::ALL {
        let n = booking::Entity::find().filter(booking::Column::Status.eq(s.as_str())).count(db).await?;
        bookings.insert(s.as_str(), n);
    }
    let mut users = BTreeMap::new();
    for r in Role::ALL {
        let n = user::Entity::find().filter(user::Column::Role.eq(r.as_str())).count(db).await?;
        users.insert(r.as_str(), n);
    }
    let unread_messages = contact_message::Entity::find()
        .filter(contact_message::Column::IsRead.eq(false))
        .count(db)
        .await?;
    let courses = course::Entity::find().count(db).await?;
    let (fees_billed, fees_collected) = fees::totals(db).await?;
    Ok(DashboardStats { bookings, unread_messages, users, courses, fees_billed, fees_collected })
}
