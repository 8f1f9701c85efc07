use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::PlanType;
use crate::errors::ModelError;
use crate::{course, installment, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_plan")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub course_id: Option<i32>,
    pub total_amount: i64,
    pub plan_type: String,
    pub installment_count: i32,
    pub start_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student, Course, Installment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(user::Entity)
                .from(Column::StudentId)
                .to(user::Column::Id)
                .into(),
            Relation::Course => Entity::belongs_to(course::Entity)
                .from(Column::CourseId)
                .to(course::Column::Id)
                .into(),
            Relation::Installment => Entity::has_many(installment::Entity).into(),
        }
    }
}

impl Related<installment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Installment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn plan_type(&self) -> Result<PlanType, ModelError> { self.plan_type.parse() }
}
