//! Output schemas for structured generation.
//!
//! The generation service is asked to conform to a JSON schema, but its
//! answer is still parsed and checked here before anything reaches the
//! repository. A single violation rejects the whole payload.

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::{CardContent, RequiredText};

/// Structural problems found in a generated payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// Required fields were missing or had the wrong JSON type.
    #[error("payload does not match the {schema} schema: {message}")]
    Shape {
        /// Schema name.
        schema: &'static str,
        /// Decoder message.
        message: String,
    },
    /// A text field was empty after trimming.
    #[error("field `{path}` is blank")]
    BlankField {
        /// JSON path of the offending field.
        path: String,
    },
    /// The card array fell outside the allowed bounds.
    #[error("expected between {min} and {max} cards, got {count}")]
    CardCount {
        /// Cards returned.
        count: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
}

/// Shape the generation service must return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSchema {
    /// `{flashcards: [{front, back}]}` for filling an existing deck.
    Flashcards,
    /// `{title, description, cards: [{front, back}]}` for a whole new deck.
    Deck,
}

/// A complete generated deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDeck {
    /// Generated title.
    pub title: RequiredText,
    /// Generated description; blank output is stored as absent.
    pub description: Option<RequiredText>,
    /// Generated cards, within the deck schema's bounds.
    pub cards: Vec<CardContent>,
}

/// Validated generation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent {
    /// Cards for an existing deck; may be empty.
    Flashcards(Vec<CardContent>),
    /// A new deck with its cards.
    Deck(GeneratedDeck),
}

#[derive(Deserialize)]
struct RawCard {
    front: String,
    back: String,
}

#[derive(Deserialize)]
struct RawFlashcards {
    flashcards: Vec<RawCard>,
}

#[derive(Deserialize)]
struct RawDeck {
    title: String,
    description: String,
    cards: Vec<RawCard>,
}

fn card_item_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["front", "back"],
        "properties": {
            "front": { "type": "string", "description": "Question or prompt side" },
            "back": { "type": "string", "description": "Answer side" },
        },
    })
}

fn required(value: String, path: impl FnOnce() -> String) -> Result<RequiredText, SchemaViolation> {
    RequiredText::new(value).map_err(|_| SchemaViolation::BlankField { path: path() })
}

fn validate_cards(field: &str, raw: Vec<RawCard>) -> Result<Vec<CardContent>, SchemaViolation> {
    raw.into_iter()
        .enumerate()
        .map(|(index, card)| {
            let front = required(card.front, || format!("{field}[{index}].front"))?;
            let back = required(card.back, || format!("{field}[{index}].back"))?;
            Ok(CardContent::new(front, back))
        })
        .collect()
}

impl OutputSchema {
    /// Fewest cards a generated deck may carry.
    pub const DECK_MIN_CARDS: usize = 5;
    /// Most cards a generated deck may carry.
    pub const DECK_MAX_CARDS: usize = 20;

    /// Schema name sent to the service.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Deck => "deck",
        }
    }

    /// JSON schema document describing the required output.
    #[must_use]
    pub fn json_schema(self) -> Value {
        match self {
            Self::Flashcards => json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["flashcards"],
                "properties": {
                    "flashcards": { "type": "array", "items": card_item_schema() },
                },
            }),
            Self::Deck => json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["title", "description", "cards"],
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "cards": {
                        "type": "array",
                        "minItems": Self::DECK_MIN_CARDS,
                        "maxItems": Self::DECK_MAX_CARDS,
                        "items": card_item_schema(),
                    },
                },
            }),
        }
    }

    /// Check `value` against this schema and convert it to typed content.
    ///
    /// Unknown extra fields are ignored.
    ///
    /// # Errors
    /// Returns the first [`SchemaViolation`] found.
    pub fn validate(self, value: &Value) -> Result<GeneratedContent, SchemaViolation> {
        let shape = |error: serde_json::Error| SchemaViolation::Shape {
            schema: self.name(),
            message: error.to_string(),
        };
        match self {
            Self::Flashcards => {
                let raw = RawFlashcards::deserialize(value).map_err(shape)?;
                validate_cards("flashcards", raw.flashcards).map(GeneratedContent::Flashcards)
            }
            Self::Deck => {
                let raw = RawDeck::deserialize(value).map_err(shape)?;
                let count = raw.cards.len();
                if !(Self::DECK_MIN_CARDS..=Self::DECK_MAX_CARDS).contains(&count) {
                    return Err(SchemaViolation::CardCount {
                        count,
                        min: Self::DECK_MIN_CARDS,
                        max: Self::DECK_MAX_CARDS,
                    });
                }
                let title = required(raw.title, || "title".to_owned())?;
                let cards = validate_cards("cards", raw.cards)?;
                Ok(GeneratedContent::Deck(GeneratedDeck {
                    title,
                    description: RequiredText::optional(Some(&raw.description)),
                    cards,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn cards(count: usize) -> Vec<Value> {
        (0..count)
            .map(|n| json!({ "front": format!("Q{n}"), "back": format!("A{n}") }))
            .collect()
    }

    #[test]
    fn empty_flashcard_arrays_are_valid() {
        let content = OutputSchema::Flashcards
            .validate(&json!({ "flashcards": [] }))
            .expect("valid");
        assert_eq!(content, GeneratedContent::Flashcards(Vec::new()));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let payload = json!({
            "flashcards": [{ "front": "Q", "back": "A", "hint": "h" }],
            "model": "x",
        });
        let GeneratedContent::Flashcards(parsed) =
            OutputSchema::Flashcards.validate(&payload).expect("valid")
        else {
            panic!("expected flashcards");
        };
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].front.as_str(), "Q");
    }

    #[rstest]
    #[case::missing_key(json!({ "cards": [] }))]
    #[case::wrong_type(json!({ "flashcards": "none" }))]
    #[case::missing_back(json!({ "flashcards": [{ "front": "Q" }] }))]
    #[case::not_an_object(json!(["Q", "A"]))]
    fn malformed_flashcards_are_rejected(#[case] payload: Value) {
        let err = OutputSchema::Flashcards
            .validate(&payload)
            .expect_err("malformed");
        assert!(matches!(err, SchemaViolation::Shape { schema: "flashcards", .. }));
    }

    #[test]
    fn blank_faces_name_the_offending_path() {
        let payload = json!({ "flashcards": [
            { "front": "Q", "back": "A" },
            { "front": "Q2", "back": "  " },
        ]});
        let err = OutputSchema::Flashcards
            .validate(&payload)
            .expect_err("blank back");
        assert_eq!(
            err,
            SchemaViolation::BlankField {
                path: "flashcards[1].back".to_owned()
            }
        );
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[case(7, true)]
    #[case(20, true)]
    #[case(21, false)]
    fn deck_card_counts_are_bounded(#[case] count: usize, #[case] ok: bool) {
        let payload = json!({ "title": "Cells", "description": "Biology", "cards": cards(count) });
        let result = OutputSchema::Deck.validate(&payload);
        assert_eq!(result.is_ok(), ok, "{count} cards");
        if !ok {
            assert!(matches!(result, Err(SchemaViolation::CardCount { .. })));
        }
    }

    #[test]
    fn blank_generated_description_becomes_absent() {
        let payload = json!({ "title": "Cells", "description": " ", "cards": cards(5) });
        let GeneratedContent::Deck(deck) = OutputSchema::Deck.validate(&payload).expect("valid")
        else {
            panic!("expected deck");
        };
        assert_eq!(deck.title.as_str(), "Cells");
        assert!(deck.description.is_none());
    }

    #[test]
    fn deck_schema_declares_card_bounds() {
        let schema = OutputSchema::Deck.json_schema();
        assert_eq!(schema["properties"]["cards"]["minItems"], 5);
        assert_eq!(schema["properties"]["cards"]["maxItems"], 20);
        assert_eq!(schema["additionalProperties"], false);
    }
}
