use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{notification, user, NotificationKind, Role, UserStatus};

use crate::errors::ServiceError;
use crate::grouping::{group_by_date, DateGroup};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    pub unread: u64,
    pub groups: Vec<DateGroup<notification::Model>>,
}

/// Send to one user, or broadcast to every active user of a role.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastInput {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub role: Option<Role>,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub kind: Option<NotificationKind>,
}

pub async fn feed<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<NotificationFeed, ServiceError> {
    let rows = notification::Entity::find()
        .filter(notification::Column::UserId.eq(user_id))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?;
    let unread = rows.iter().filter(|n| !n.is_read).count() as u64;
    Ok(NotificationFeed { unread, groups: group_by_date(rows, |n| n.created_at) })
}

pub async fn unread_count<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, ServiceError> {
    Ok(notification::Entity::find()
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?)
}

/// Other users' notifications read as missing.
pub async fn mark_read<C: ConnectionTrait>(db: &C, user_id: i32, id: i32) -> Result<(), ServiceError> {
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::Id.eq(id))
        .filter(notification::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("notification"));
    }
    Ok(())
}

pub async fn mark_all_read<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, ServiceError> {
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Returns how many notifications were created. All rows commit together.
#[instrument(skip(db, input), fields(user_id = ?input.user_id, role = ?input.role))]
pub async fn broadcast(db: &DatabaseConnection, input: BroadcastInput) -> Result<u64, ServiceError> {
    let kind = input.kind.unwrap_or(NotificationKind::Info);
    let targets: Vec<i32> = match (input.user_id, input.role) {
        (Some(uid), None) => {
            if user::Entity::find_by_id(uid).one(db).await?.is_none() {
                return Err(ServiceError::validation(format!("user {uid} does not exist")));
            }
            vec![uid]
        }
        (None, Some(role)) => user::Entity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .filter(user::Column::Status.eq(UserStatus::Active.as_str()))
            .all(db)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect(),
        _ => return Err(ServiceError::validation("exactly one of user_id or role is required")),
    };
    let txn = db.begin().await?;
    for uid in &targets {
        if let Err(e) = notification::push(&txn, *uid, kind, &input.title, &input.body).await {
            txn.rollback().await?;
            return Err(e.into());
        }
    }
    txn.commit().await?;
    info!(created = targets.len(), kind = %kind, "notifications sent");
    Ok(targets.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};

    fn to_role(role: Role) -> BroadcastInput {
        BroadcastInput { user_id: None, role: Some(role), title: "Eid holidays".into(), body: "No classes Friday".into(), kind: None }
    }

    #[tokio::test]
    async fn broadcast_and_read_flow() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = seed_user(&db, "a@example.com", Role::Student).await?;
        let b = seed_user(&db, "b@example.com", Role::Student).await?;
        seed_user(&db, "t@example.com", Role::Teacher).await?;

        assert_eq!(broadcast(&db, to_role(Role::Student)).await?, 2);
        let mut both = to_role(Role::Student);
        both.user_id = Some(a.id);
        assert!(matches!(broadcast(&db, both).await, Err(ServiceError::Validation(_))));

        let f = feed(&db, a.id).await?;
        assert_eq!(f.unread, 1);
        let id = f.groups[0].items[0].id;
        assert!(matches!(mark_read(&db, b.id, id).await, Err(ServiceError::NotFound(_))));
        mark_read(&db, a.id, id).await?;
        assert_eq!(unread_count(&db, a.id).await?, 0);

        let single = BroadcastInput { user_id: Some(b.id), role: None, title: "Hi".into(), body: "x".into(), kind: Some(NotificationKind::Fee) };
        broadcast(&db, single).await?;
        assert_eq!(mark_all_read(&db, b.id).await?, 2);
        assert_eq!(mark_all_read(&db, b.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_broadcast_leaves_no_rows() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = seed_user(&db, "a@example.com", Role::Student).await?;
        seed_user(&db, "b@example.com", Role::Student).await?;

        let mut long = to_role(Role::Student);
        long.body = "x".repeat(4001);
        assert!(matches!(broadcast(&db, long).await, Err(ServiceError::Validation(_))));
        assert_eq!(notification::Entity::find().count(&db).await?, 0);
        assert_eq!(unread_count(&db, a.id).await?, 0);
        Ok(())
    }
}
