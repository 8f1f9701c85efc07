use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::InstallmentStatus;
use crate::{fee_plan, payment};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "installment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub fee_plan_id: i32,
    pub seq: i32,
    pub amount: i64,
    pub paid_amount: i64,
    pub due_date: Date,
    pub status: String,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { FeePlan, Payment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::FeePlan => Entity::belongs_to(fee_plan::Entity)
                .from(Column::FeePlanId)
                .to(fee_plan::Column::Id)
                .into(),
            Relation::Payment => Entity::has_many(payment::Entity).into(),
        }
    }
}

impl Related<fee_plan::Entity> for Entity {
    fn to() -> RelationDef { Relation::FeePlan.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn outstanding(&self) -> i64 { (self.amount - self.paid_amount).max(0) }

    /// Status as shown to users: unpaid installments past their due date
    /// read as `overdue`.
    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        let stored = self.status.parse().unwrap_or(InstallmentStatus::Pending);
        if stored != InstallmentStatus::Paid && self.due_date < today {
            InstallmentStatus::Overdue
        } else {
            stored
        }
    }
}
