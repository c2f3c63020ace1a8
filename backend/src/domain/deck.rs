//! Deck and card entities.
//!
//! A deck belongs to exactly one owner for its whole life; cards belong to
//! exactly one deck and disappear with it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CardId, DeckId, OwnerId, RequiredText};

/// Persisted deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Store-assigned identifier.
    pub id: DeckId,
    /// Owning identity.
    pub owner_id: OwnerId,
    /// Non-empty title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time; never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

/// Persisted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Store-assigned identifier.
    pub id: CardId,
    /// Parent deck.
    pub deck_id: DeckId,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDraft {
    /// Deck title.
    pub title: RequiredText,
    /// Description; blank input is stored as absent.
    pub description: Option<RequiredText>,
}

impl DeckDraft {
    /// Build a draft from a validated title and raw description.
    #[must_use]
    pub fn new(title: RequiredText, description: Option<&str>) -> Self {
        Self {
            title,
            description: RequiredText::optional(description),
        }
    }

    /// Description as stored, if any.
    #[must_use]
    pub fn description_str(&self) -> Option<&str> {
        self.description.as_ref().map(RequiredText::as_str)
    }
}

/// How an update treats the stored description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionUpdate {
    /// Field omitted: keep the stored value.
    Unchanged,
    /// Field present but blank: clear it.
    Clear,
    /// Replace with new text.
    Set(RequiredText),
}

impl DescriptionUpdate {
    /// Interpret an optional raw description field.
    #[must_use]
    pub fn from_field(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Unchanged,
            Some(value) => RequiredText::new(value).map_or(Self::Clear, Self::Set),
        }
    }
}

/// Validated changes for an existing deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckChanges {
    /// Replacement title.
    pub title: RequiredText,
    /// Description handling.
    pub description: DescriptionUpdate,
}

/// Validated front/back pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    /// Question side.
    pub front: RequiredText,
    /// Answer side.
    pub back: RequiredText,
}

impl CardContent {
    /// Pair two validated faces.
    #[must_use]
    pub fn new(front: RequiredText, back: RequiredText) -> Self {
        Self { front, back }
    }
}

/// Deck together with its cards, newest card first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckDetail {
    /// The deck.
    pub deck: Deck,
    /// Cards ordered by creation time, newest first.
    pub cards: Vec<Card>,
}
