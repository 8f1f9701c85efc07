use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use models::{testimonial, validate};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialInput {
    pub author_name: String,
    pub content: String,
    pub rating: i16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialUpdate {
    pub is_approved: Option<bool>,
    pub content: Option<String>,
    pub rating: Option<i16>,
}

/// Public submissions wait for approval.
pub async fn submit<C: ConnectionTrait>(db: &C, input: TestimonialInput) -> Result<testimonial::Model, ServiceError> {
    let am = testimonial::ActiveModel {
        author_name: Set(validate::required_text("author_name", &input.author_name, 128)?),
        content: Set(validate::required_text("content", &input.content, 2000)?),
        rating: Set(testimonial::validate_rating(input.rating)?),
        is_approved: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, "testimonial submitted");
    Ok(m)
}

/// Newest first. `approved_only` is what the public site sees.
pub async fn list<C: ConnectionTrait>(db: &C, approved_only: bool) -> Result<Vec<testimonial::Model>, ServiceError> {
    let mut q = testimonial::Entity::find();
    if approved_only {
        q = q.filter(testimonial::Column::IsApproved.eq(true));
    }
    Ok(q
        .order_by_desc(testimonial::Column::CreatedAt)
        .order_by_desc(testimonial::Column::Id)
        .all(db)
        .await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, id: i32, input: TestimonialUpdate) -> Result<testimonial::Model, ServiceError> {
    let found = testimonial::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("testimonial"))?;
    let mut am: testimonial::ActiveModel = found.into();
    if let Some(a) = input.is_approved {
        am.is_approved = Set(a);
    }
    if let Some(c) = input.content.as_deref() {
        am.content = Set(validate::required_text("content", c, 2000)?);
    }
    if let Some(r) = input.rating {
        am.rating = Set(testimonial::validate_rating(r)?);
    }
    let m = am.update(db).await?;
    info!(id = %m.id, approved = m.is_approved, "testimonial updated");
    Ok(m)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = testimonial::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
