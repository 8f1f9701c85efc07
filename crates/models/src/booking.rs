use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::BookingStatus;
use crate::errors::ModelError;
use crate::{course, service_offering};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub course_id: Option<i32>,
    pub service_id: Option<i32>,
    pub preferred_time: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Course, Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Course => Entity::belongs_to(course::Entity)
                .from(Column::CourseId)
                .to(course::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(service_offering::Entity)
                .from(Column::ServiceId)
                .to(service_offering::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<BookingStatus, ModelError> { self.status.parse() }
}
