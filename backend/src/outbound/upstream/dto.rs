//! DTO for reading upstream error bodies.
//!
//! Upstream reports failures as `{ "error": ... }`, `{ "message": ... }` or
//! `{ "detail": ... }`, where `detail` may also be a list of validation
//! entries carrying `msg`.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpstreamErrorDto {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    detail: Option<Value>,
}

impl UpstreamErrorDto {
    /// First non-blank message in `error`, `message`, then `detail` order.
    pub(super) fn into_message(self) -> Option<String> {
        [self.error, self.message, self.detail]
            .into_iter()
            .flatten()
            .find_map(|value| text_of(&value))
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Array(entries) => entries.iter().find_map(|entry| {
            entry.get("msg").and_then(text_of).or_else(|| text_of(entry))
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::error_field(json!({ "error": "Blog not found" }), Some("Blog not found"))]
    #[case::message_field(json!({ "message": "Title taken" }), Some("Title taken"))]
    #[case::detail_field(json!({ "detail": "Not authenticated" }), Some("Not authenticated"))]
    #[case::validation_list(
        json!({ "detail": [{ "loc": ["body", "title"], "msg": "field required" }] }),
        Some("field required")
    )]
    #[case::error_wins(json!({ "error": "first", "detail": "second" }), Some("first"))]
    #[case::blank_skipped(json!({ "error": "  ", "detail": "second" }), Some("second"))]
    #[case::nothing(json!({ "status": 500 }), None)]
    fn extracts_the_most_specific_message(#[case] body: Value, #[case] expected: Option<&str>) {
        let dto: UpstreamErrorDto = serde_json::from_value(body).expect("dto decodes");
        assert_eq!(dto.into_message().as_deref(), expected);
    }
}
