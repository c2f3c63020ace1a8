//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request payloads are parsed in full before any service call. Every
//! violated field is collected, and the request fails once with all of them
//! listed under `details.fields`, so nothing is applied from a malformed
//! input.

use serde::Serialize;
use serde_json::json;

use crate::domain::{CardId, DeckId, Error, RequiredText};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ViolationCode {
    MissingField,
    BlankField,
    InvalidId,
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FieldViolation {
    field: &'static str,
    code: ViolationCode,
    message: String,
}

/// Accumulates field violations for one request.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<FieldViolation>);

impl Violations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: FieldName, code: ViolationCode, message: String) {
        self.0.push(FieldViolation {
            field: field.as_str(),
            code,
            message,
        });
    }

    /// Non-blank text for a required field.
    pub(crate) fn required_text(
        &mut self,
        field: FieldName,
        value: Option<&str>,
    ) -> Option<RequiredText> {
        let Some(raw) = value else {
            self.push(
                field,
                ViolationCode::MissingField,
                format!("missing required field: {}", field.as_str()),
            );
            return None;
        };
        match RequiredText::new(raw) {
            Ok(text) => Some(text),
            Err(_) => {
                self.push(
                    field,
                    ViolationCode::BlankField,
                    format!("{} must not be blank", field.as_str()),
                );
                None
            }
        }
    }

    /// Positive numeric deck identifier.
    pub(crate) fn deck_id(&mut self, field: FieldName, raw: &str) -> Option<DeckId> {
        match raw.parse() {
            Ok(id) => Some(id),
            Err(error) => {
                self.push(field, ViolationCode::InvalidId, format!("{}: {error}", field.as_str()));
                None
            }
        }
    }

    /// Positive numeric card identifier.
    pub(crate) fn card_id(&mut self, field: FieldName, raw: &str) -> Option<CardId> {
        match raw.parse() {
            Ok(id) => Some(id),
            Err(error) => {
                self.push(field, ViolationCode::InvalidId, format!("{}: {error}", field.as_str()));
                None
            }
        }
    }

    /// Fail with every collected violation, or return `value` untouched.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, Error> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self.into_error()),
        }
    }

    fn into_error(self) -> Error {
        let summary = self
            .0
            .iter()
            .map(|violation| violation.field)
            .collect::<Vec<_>>()
            .join(", ");
        Error::invalid_request(format!("invalid fields: {summary}"))
            .with_details(json!({ "fields": self.0 }))
    }
}

pub(crate) const DECK_ID: FieldName = FieldName::new("deckId");
pub(crate) const CARD_ID: FieldName = FieldName::new("cardId");
pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const FRONT: FieldName = FieldName::new("front");
pub(crate) const BACK: FieldName = FieldName::new("back");
pub(crate) const PROMPT: FieldName = FieldName::new("prompt");

/// Parse a deck id from a path segment.
pub(crate) fn parse_deck_id(raw: &str) -> Result<DeckId, Error> {
    let mut violations = Violations::new();
    let id = violations.deck_id(DECK_ID, raw);
    violations.finish(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[test]
    fn collects_every_violation_before_failing() {
        let mut violations = Violations::new();
        let front = violations.required_text(FRONT, Some("  "));
        let back = violations.required_text(BACK, None);
        let err = violations
            .finish(front.zip(back))
            .expect_err("both faces invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let fields = err.details().expect("details")["fields"]
            .as_array()
            .expect("array")
            .clone();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "front");
        assert_eq!(fields[0]["code"], "blank_field");
        assert_eq!(fields[1]["field"], "back");
        assert_eq!(fields[1]["code"], "missing_field");
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case(" 7 ", Some(7))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    fn deck_ids_are_coerced_from_text(#[case] raw: &str, #[case] expected: Option<i64>) {
        let parsed = parse_deck_id(raw).ok().map(DeckId::get);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn valid_input_passes_through() {
        let mut violations = Violations::new();
        let title = violations.required_text(TITLE, Some(" Biology "));
        let title = violations.finish(title).expect("valid");
        assert_eq!(title.as_str(), "Biology");
    }
}
