//! Contact-form inbox and direct messages between dashboard users.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{class_session, contact_message, direct_message, notification, user, validate, NotificationKind, Role, UserStatus};

use crate::errors::ServiceError;
use crate::grouping::{group_by_date, DateGroup};
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectMessageInput {
    pub recipient_id: i32,
    pub body: String,
}

/// A direct message with both parties' names, from the viewer's side.
#[derive(Debug, Clone, Serialize)]
pub struct DirectMessageView {
    pub id: i32,
    pub sender_id: i32,
    pub sender_name: String,
    pub recipient_id: i32,
    pub recipient_name: String,
    pub body: String,
    pub is_read: bool,
    pub outgoing: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub role: String,
}

#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create_contact_message<C: ConnectionTrait>(db: &C, input: ContactInput) -> Result<contact_message::Model, ServiceError> {
    let am = contact_message::ActiveModel {
        name: Set(user::validate_name(&input.name)?),
        email: Set(user::validate_email(&input.email)?),
        subject: Set(validate::optional_text("subject", input.subject.as_deref(), 200)?),
        body: Set(validate::required_text("body", &input.body, 4000)?),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, "received contact message");
    Ok(m)
}

pub async fn list_contact_messages<C: ConnectionTrait>(
    db: &C,
    unread_only: Option<bool>,
    opts: Pagination,
) -> Result<Paged<contact_message::Model>, ServiceError> {
    let mut q = contact_message::Entity::find();
    if let Some(unread) = unread_only {
        q = q.filter(contact_message::Column::IsRead.eq(!unread));
    }
    let q = q.order_by_desc(contact_message::Column::CreatedAt).order_by_desc(contact_message::Column::Id);
    fetch_page(db, q, opts).await
}

pub async fn set_contact_read<C: ConnectionTrait>(db: &C, id: i32, is_read: bool) -> Result<contact_message::Model, ServiceError> {
    let found = contact_message::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("message"))?;
    let mut am: contact_message::ActiveModel = found.into();
    am.is_read = Set(is_read);
    Ok(am.update(db).await?)
}

pub async fn delete_contact_message<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = contact_message::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

async fn names_by_id<C: ConnectionTrait>(db: &C, ids: impl IntoIterator<Item = i32>) -> Result<HashMap<i32, String>, ServiceError> {
    let ids: Vec<i32> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = user::Entity::find().filter(user::Column::Id.is_in(ids)).all(db).await?;
    Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
}

/// Users `user_id` may message. Students reach their teachers, teachers
/// their students, and both reach every admin. Admins reach everyone.
pub async fn contacts<C: ConnectionTrait>(db: &C, user_id: i32, role: Role) -> Result<Vec<Contact>, ServiceError> {
    let active = user::Column::Status.eq(UserStatus::Active.as_str());
    let q = match role {
        Role::Admin => user::Entity::find().filter(active).filter(user::Column::Id.ne(user_id)),
        Role::Student | Role::Teacher => {
            let (mine, theirs) = match role {
                Role::Student => (class_session::Column::StudentId, class_session::Column::TeacherId),
                _ => (class_session::Column::TeacherId, class_session::Column::StudentId),
            };
            let linked: Vec<i32> = class_session::Entity::find()
                .select_only()
                .column(theirs)
                .filter(mine.eq(user_id))
                .distinct()
                .into_tuple()
                .all(db)
                .await?;
            user::Entity::find().filter(active).filter(
                Condition::any()
                    .add(user::Column::Role.eq(Role::Admin.as_str()))
                    .add(user::Column::Id.is_in(linked)),
            )
        }
    };
    let users = q.order_by_asc(user::Column::Name).all(db).await?;
    Ok(users.into_iter().map(|u| Contact { id: u.id, name: u.name, role: u.role }).collect())
}

#[instrument(skip(db, input), fields(recipient_id = %input.recipient_id))]
pub async fn send_direct_message<C: ConnectionTrait>(
    db: &C,
    sender_id: i32,
    sender_role: Role,
    input: DirectMessageInput,
) -> Result<direct_message::Model, ServiceError> {
    let body = validate::required_text("body", &input.body, 4000)?;
    if input.recipient_id == sender_id {
        return Err(ServiceError::validation("cannot message yourself"));
    }
    let recipient = user::Entity::find_by_id(input.recipient_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::validation(format!("user {} does not exist", input.recipient_id)))?;
    let allowed = contacts(db, sender_id, sender_role).await?;
    if !allowed.iter().any(|c| c.id == recipient.id) {
        return Err(ServiceError::Forbidden("recipient is not one of your contacts".into()));
    }
    let sender_name = names_by_id(db, [sender_id]).await?.remove(&sender_id).unwrap_or_default();

    let am = direct_message::ActiveModel {
        sender_id: Set(sender_id),
        recipient_id: Set(recipient.id),
        body: Set(body),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    notification::push(db, recipient.id, NotificationKind::Message, "New message", &format!("New message from {sender_name}")).await?;
    info!(id = %m.id, sender_id = %sender_id, recipient_id = %recipient.id, "sent direct message");
    Ok(m)
}

/// Messages sent or received by `user_id`, grouped by day.
pub async fn inbox<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<DateGroup<DirectMessageView>>, ServiceError> {
    let rows = direct_message::Entity::find()
        .filter(
            Condition::any()
                .add(direct_message::Column::SenderId.eq(user_id))
                .add(direct_message::Column::RecipientId.eq(user_id)),
        )
        .all(db)
        .await?;
    let names = names_by_id(db, rows.iter().flat_map(|m| [m.sender_id, m.recipient_id])).await?;
    let name = |id: i32| names.get(&id).cloned().unwrap_or_default();
    let views = rows
        .into_iter()
        .map(|m| DirectMessageView {
            id: m.id,
            sender_id: m.sender_id,
            sender_name: name(m.sender_id),
            recipient_id: m.recipient_id,
            recipient_name: name(m.recipient_id),
            body: m.body,
            is_read: m.is_read,
            outgoing: m.sender_id == user_id,
            created_at: m.created_at,
        })
        .collect();
    Ok(group_by_date(views, |v| v.created_at))
}

pub async fn unread_direct_count<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, ServiceError> {
    use sea_orm::PaginatorTrait;
    Ok(direct_message::Entity::find()
        .filter(direct_message::Column::RecipientId.eq(user_id))
        .filter(direct_message::Column::IsRead.eq(false))
        .count(db)
        .await?)
}

/// Only the recipient may mark a message read.
pub async fn mark_direct_read<C: ConnectionTrait>(db: &C, user_id: i32, id: i32) -> Result<(), ServiceError> {
    let m = direct_message::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("message"))?;
    if m.recipient_id != user_id {
        return Err(ServiceError::Forbidden("only the recipient can mark a message read".into()));
    }
    direct_message::Entity::update_many()
        .col_expr(direct_message::Column::IsRead, Expr::value(true))
        .filter(direct_message::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}
