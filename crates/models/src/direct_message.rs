use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "direct_message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Sender, Recipient }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Sender => Entity::belongs_to(user::Entity)
                .from(Column::SenderId)
                .to(user::Column::Id)
                .into(),
            Relation::Recipient => Entity::belongs_to(user::Entity)
                .from(Column::RecipientId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
