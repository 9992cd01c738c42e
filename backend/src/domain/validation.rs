//! Field-level validation shared by the write paths.

use serde_json::json;

use super::Error;

/// A single rejected request field.
///
/// Converted into an [`Error`] with code `invalid_request` and details
/// `{ "field": ..., "code": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldViolation {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldViolation {
    /// The field is missing or blank once trimmed.
    #[must_use]
    pub fn blank(field: &'static str) -> Self {
        Self {
            field,
            code: "blank",
            message: format!("{field} must not be empty"),
        }
    }

    /// The field exceeds `max` characters.
    #[must_use]
    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self {
            field,
            code: "too_long",
            message: format!("{field} must be at most {max} characters"),
        }
    }

    /// The field holds a value outside its accepted set or format.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code: "invalid",
            message: message.into(),
        }
    }

    /// The body carried no fields to change.
    #[must_use]
    pub fn empty_patch() -> Self {
        Self {
            field: "body",
            code: "empty_patch",
            message: "update must change at least one field".to_owned(),
        }
    }

    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Machine-readable violation code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<FieldViolation> for Error {
    fn from(violation: FieldViolation) -> Self {
        Self::invalid_request(violation.message.as_str())
            .with_details(json!({ "field": violation.field, "code": violation.code }))
    }
}

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub(crate) fn required_text(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<String, FieldViolation> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldViolation::blank(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_owned())
}

/// Trim an optional value, mapping blank to `None` and enforcing `max`.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<Option<String>, FieldViolation> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_length(field, trimmed, max)?;
            Ok(Some(trimmed.to_owned()))
        }
    }
}

fn check_length(field: &'static str, value: &str, max: Option<usize>) -> Result<(), FieldViolation> {
    match max {
        Some(limit) if value.chars().count() > limit => Err(FieldViolation::too_long(field, limit)),
        _ => Ok(()),
    }
}

/// Trim tags and drop blanks.
pub(crate) fn clean_tags(tags: Option<Vec<String>>) -> Vec<String> {
    tags.unwrap_or_default()
        .into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}
