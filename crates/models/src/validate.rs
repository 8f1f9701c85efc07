use crate::errors::ModelError;

/// Trimmed, non-empty text of at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if v.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} too long (<= {max} chars)")));
    }
    Ok(v.to_string())
}

/// Blank input collapses to `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

pub fn non_negative(field: &str, value: i64) -> Result<i64, ModelError> {
    if value < 0 {
        return Err(ModelError::Validation(format!("{field} must be >= 0")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_bounds() {
        assert_eq!(required_text("title", "  Tajweed  ", 10).unwrap(), "Tajweed");
        assert!(required_text("title", "   ", 10).is_err());
        assert!(required_text("title", "x".repeat(11).as_str(), 10).is_err());
        // counted in characters, not bytes
        assert!(required_text("title", "قرآن", 4).is_ok());
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(optional_text("phone", Some("  "), 5).unwrap(), None);
        assert_eq!(optional_text("phone", None, 5).unwrap(), None);
        assert_eq!(optional_text("phone", Some(" 123 "), 5).unwrap(), Some("123".into()));
    }
}
