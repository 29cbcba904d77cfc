//! Request field validation shared by all catalog endpoints.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Message returned whenever a required create/update field is absent.
pub const MISSING_FIELDS: &str = "Missing required fields";

/// Maximum length of a category, author or book name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of an ISBN as stored.
pub const MAX_ISBN_LENGTH: usize = 32;

/// Return the trimmed value, or a validation error if it is absent or blank.
pub fn required_text(value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(MISSING_FIELDS.into())),
    }
}

/// Return the id, or a validation error if it is absent.
pub fn required_id(value: Option<DbId>) -> Result<DbId, CoreError> {
    value.ok_or_else(|| CoreError::Validation(MISSING_FIELDS.into()))
}

/// Reject values longer than `max` characters.
pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Parse a form-encoded id. Blank input counts as missing.
pub fn parse_id(field: &str, raw: Option<&str>) -> Result<DbId, CoreError> {
    let text = required_text(raw)?;
    match text.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!(
            "{field} must be a positive integer"
        ))),
    }
}

/// Parse a form-encoded stock count. Must be a non-negative integer.
pub fn parse_stock(raw: Option<&str>) -> Result<i32, CoreError> {
    let text = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation(MISSING_FIELDS.into()))?;
    match text.parse::<i32>() {
        Ok(stock) if stock >= 0 => Ok(stock),
        _ => Err(CoreError::Validation(
            "stock must be a non-negative integer".into(),
        )),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

/// Deserialize an optional id that may arrive as a JSON number or a numeric
/// string. `null`, `""` and non-positive numbers become `None`.
///
/// Use together with `#[serde(default)]` so an absent key is also `None`.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<IdRepr>::deserialize(deserializer)? {
        None => None,
        Some(IdRepr::Number(n)) => Some(n),
        Some(IdRepr::Text(s)) if s.trim().is_empty() => None,
        Some(IdRepr::Text(s)) => Some(
            s.trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid id '{s}'")))?,
        ),
    };
    Ok(id.filter(|n| *n > 0))
}
