use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::installment;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub installment_id: i32,
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub paid_at: DateTimeWithTimeZone,
    pub recorded_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Installment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Installment => Entity::belongs_to(installment::Entity)
                .from(Column::InstallmentId)
                .to(installment::Column::Id)
                .into(),
        }
    }
}

impl Related<installment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Installment.def() }
}

impl ActiveModelBehavior for ActiveModel {}
