//! Courses and service offerings shown on the marketing site.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::{course, service_offering, validate};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<i32>,
    #[serde(default)]
    pub monthly_fee: i64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub monthly_fee: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

fn description(value: Option<&str>) -> Result<String, ServiceError> {
    Ok(validate::optional_text("description", value, 10_000)?.unwrap_or_default())
}

async fn ensure_slug_free<C: ConnectionTrait>(db: &C, slug: &str, except: Option<i32>) -> Result<(), ServiceError> {
    let mut q = course::Entity::find().filter(course::Column::Slug.eq(slug));
    if let Some(id) = except {
        q = q.filter(course::Column::Id.ne(id));
    }
    if q.one(db).await?.is_some() {
        return Err(ServiceError::Conflict(format!("course slug '{slug}' already in use")));
    }
    Ok(())
}

/// First free `course-<n>` for titles that yield no latin slug.
async fn generated_slug<C: ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
    let mut n = course::Entity::find().count(db).await? + 1;
    loop {
        let slug = format!("course-{n}");
        if course::Entity::find().filter(course::Column::Slug.eq(&slug)).one(db).await?.is_none() {
            return Ok(slug);
        }
        n += 1;
    }
}

/// Courses ordered by title. `active_only` hides retired courses.
pub async fn list_courses<C: ConnectionTrait>(db: &C, active_only: bool) -> Result<Vec<course::Model>, ServiceError> {
    let mut q = course::Entity::find();
    if active_only {
        q = q.filter(course::Column::IsActive.eq(true));
    }
    Ok(q.order_by_asc(course::Column::Title).all(db).await?)
}

pub async fn get_course<C: ConnectionTrait>(db: &C, id: i32) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("course"))
}

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_course<C: ConnectionTrait>(db: &C, input: CourseInput) -> Result<course::Model, ServiceError> {
    let title = course::validate_title(&input.title)?;
    let slug = match input.slug.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(s) => course::slugify(s)?,
        None => match course::title_slug(&title) {
            Some(s) => s,
            None => generated_slug(db).await?,
        },
    };
    ensure_slug_free(db, &slug, None).await?;
    let now = Utc::now().into();
    let am = course::ActiveModel {
        title: Set(title),
        slug: Set(slug),
        description: Set(description(input.description.as_deref())?),
        duration_weeks: Set(course::validate_duration_weeks(input.duration_weeks.unwrap_or(12))?),
        monthly_fee: Set(validate::non_negative("monthly_fee", input.monthly_fee)?),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, slug = %m.slug, "created course");
    Ok(m)
}

#[instrument(skip(db, input))]
pub async fn update_course<C: ConnectionTrait>(db: &C, id: i32, input: CourseUpdate) -> Result<course::Model, ServiceError> {
    let mut am: course::ActiveModel = get_course(db, id).await?.into();
    if let Some(t) = input.title.as_deref() {
        am.title = Set(course::validate_title(t)?);
    }
    if let Some(s) = input.slug.as_deref() {
        let slug = course::slugify(s)?;
        ensure_slug_free(db, &slug, Some(id)).await?;
        am.slug = Set(slug);
    }
    if let Some(d) = input.description.as_deref() {
        am.description = Set(description(Some(d))?);
    }
    if let Some(w) = input.duration_weeks {
        am.duration_weeks = Set(course::validate_duration_weeks(w)?);
    }
    if let Some(fee) = input.monthly_fee {
        am.monthly_fee = Set(validate::non_negative("monthly_fee", fee)?);
    }
    if let Some(a) = input.is_active {
        am.is_active = Set(a);
    }
    am.updated_at = Set(Utc::now().into());
    let m = am.update(db).await?;
    info!(id = %m.id, "updated course");
    Ok(m)
}

/// Returns `false` when nothing was deleted.
pub async fn delete_course<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = course::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn list_services<C: ConnectionTrait>(db: &C, active_only: bool) -> Result<Vec<service_offering::Model>, ServiceError> {
    let mut q = service_offering::Entity::find();
    if active_only {
        q = q.filter(service_offering::Column::IsActive.eq(true));
    }
    Ok(q
        .order_by_asc(service_offering::Column::SortOrder)
        .order_by_asc(service_offering::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_service<C: ConnectionTrait>(db: &C, id: i32) -> Result<service_offering::Model, ServiceError> {
    service_offering::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("service"))
}

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_service<C: ConnectionTrait>(db: &C, input: ServiceInput) -> Result<service_offering::Model, ServiceError> {
    let now = Utc::now().into();
    let am = service_offering::ActiveModel {
        title: Set(validate::required_text("title", &input.title, 200)?),
        description: Set(description(input.description.as_deref())?),
        icon: Set(validate::optional_text("icon", input.icon.as_deref(), 64)?),
        is_active: Set(input.is_active.unwrap_or(true)),
        sort_order: Set(input.sort_order.unwrap_or(0)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, "created service");
    Ok(m)
}

pub async fn update_service<C: ConnectionTrait>(db: &C, id: i32, input: ServiceUpdate) -> Result<service_offering::Model, ServiceError> {
    let mut am: service_offering::ActiveModel = get_service(db, id).await?.into();
    if let Some(t) = input.title.as_deref() {
        am.title = Set(validate::required_text("title", t, 200)?);
    }
    if let Some(d) = input.description.as_deref() {
        am.description = Set(description(Some(d))?);
    }
    if input.icon.is_some() {
        am.icon = Set(validate::optional_text("icon", input.icon.as_deref(), 64)?);
    }
    if let Some(a) = input.is_active {
        am.is_active = Set(a);
    }
    if let Some(o) = input.sort_order {
        am.sort_order = Set(o);
    }
    am.updated_at = Set(Utc::now().into());
    let m = am.update(db).await?;
    info!(id = %m.id, "updated service");
    Ok(m)
}

pub async fn delete_service<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = service_offering::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
