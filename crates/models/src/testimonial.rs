use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testimonial")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub author_name: String,
    pub content: String,
    pub rating: i16,
    pub is_approved: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i16) -> Result<i16, ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::Validation("rating must be in 1..=5".into()));
    }
    Ok(rating)
}
