use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Weekly recurring class slot. `weekday` is 0 = Monday .. 6 = Sunday.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_session")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_id: Option<i32>,
    pub teacher_id: i32,
    pub student_id: i32,
    pub weekday: i16,
    pub start_time: String,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

pub fn validate_weekday(weekday: i16) -> Result<i16, ModelError> {
    if !(0..=6).contains(&weekday) {
        return Err(ModelError::Validation("weekday must be in 0..=6 (0 = Monday)".into()));
    }
    Ok(weekday)
}

/// `HH:MM`, 24-hour clock, zero padded.
pub fn validate_start_time(value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    let bad = || ModelError::Validation(format!("start_time must be HH:MM, got '{v}'"));
    let (h, m) = v.split_once(':').ok_or_else(bad)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(bad());
    }
    let h: u8 = h.parse().map_err(|_| bad())?;
    let m: u8 = m.parse().map_err(|_| bad())?;
    if h > 23 || m > 59 {
        return Err(bad());
    }
    Ok(format!("{h:02}:{m:02}"))
}

pub fn validate_duration(minutes: i32) -> Result<i32, ModelError> {
    if !(15..=240).contains(&minutes) {
        return Err(ModelError::Validation("duration_minutes must be in 15..=240".into()));
    }
    Ok(minutes)
}
