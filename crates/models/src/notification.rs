use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::enums::NotificationKind;
use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert an unread notification for `user_id`.
pub async fn push<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: NotificationKind,
    title: &str,
    body: &str,
) -> Result<Model, ModelError> {
    let title = crate::validate::required_text("title", title, 200)?;
    let body = crate::validate::required_text("body", body, 4000)?;
    let am = ActiveModel {
        user_id: Set(user_id),
        title: Set(title),
        body: Set(body),
        kind: Set(kind.into()),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
