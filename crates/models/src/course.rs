use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub duration_weeks: i32,
    pub monthly_fee: i64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<String, ModelError> {
    crate::validate::required_text("title", title, 200)
}

/// URL slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(input: &str) -> Result<String, ModelError> {
    title_slug(input).ok_or_else(|| ModelError::Validation("slug must contain at least one latin letter or digit".into()))
}

/// Slug derived from a title; `None` when the title has no ASCII alphanumerics
/// (Arabic or Urdu titles), in which case the caller generates one.
pub fn title_slug(input: &str) -> Option<String> {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        return None;
    }
    slug.truncate(220);
    Some(slug.trim_end_matches('-').to_string())
}

pub fn validate_duration_weeks(weeks: i32) -> Result<i32, ModelError> {
    if !(1..=520).contains(&weeks) {
        return Err(ModelError::Validation("duration_weeks must be in 1..=520".into()));
    }
    Ok(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Noorani Qaida -- for Kids! ").unwrap(), "noorani-qaida-for-kids");
        assert_eq!(slugify("Hifz 2.0").unwrap(), "hifz-2-0");
    }

    #[test]
    fn slugify_needs_ascii_content() {
        assert!(slugify("تجويد").is_err());
        assert_eq!(slugify("تجويد Tajweed").unwrap(), "tajweed");
        assert_eq!(title_slug("تجويد القرآن"), None);
    }

    #[test]
    fn duration_bounds() {
        assert!(validate_duration_weeks(0).is_err());
        assert_eq!(validate_duration_weeks(12).unwrap(), 12);
    }
}
