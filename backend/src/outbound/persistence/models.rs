//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Card, CardId, Deck, DeckId, IdentityValidationError, OwnerId};

use super::schema::{cards, decks};

/// Row struct for reading from the decks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeckRow {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DeckRow> for Deck {
    type Error = IdentityValidationError;

    fn try_from(row: DeckRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DeckId::new(row.id),
            owner_id: OwnerId::new(row.owner_id)?,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating deck records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = decks)]
pub(crate) struct NewDeckRow<'a> {
    pub owner_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for deck updates.
///
/// `description: None` leaves the column untouched; `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = decks)]
pub(crate) struct DeckChangeset<'a> {
    pub title: &'a str,
    pub description: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the cards table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRow {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Self {
            id: CardId::new(row.id),
            deck_id: DeckId::new(row.deck_id),
            front: row.front,
            back: row.back,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating card records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub deck_id: i64,
    pub front: &'a str,
    pub back: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for card updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
pub(crate) struct CardChangeset<'a> {
    pub front: &'a str,
    pub back: &'a str,
    pub updated_at: DateTime<Utc>,
}
