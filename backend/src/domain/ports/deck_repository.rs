//! Port for deck and card persistence.
//!
//! Every read and write that touches an existing deck is qualified by the
//! owning identity. A predicate that matches no row is reported as `None` or
//! `false`; the service layer turns that into a not-found error without
//! revealing whether the deck exists for somebody else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Card, CardId, Deck, DeckId, OwnerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by deck repository adapters.
    pub enum DeckRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "deck repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "deck repository query failed: {message}",
        /// A card insert referenced a deck that no longer exists.
        DeckNotFound { deck_id: i64 } =>
            "deck {deck_id} does not exist",
    }
}

/// Deck row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeck {
    /// Owning identity.
    pub owner_id: OwnerId,
    /// Validated title.
    pub title: String,
    /// Description, already normalised (blank is `None`).
    pub description: Option<String>,
    /// Creation timestamp; also used as the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

/// Replacement values for an owned deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckUpdate {
    /// New title.
    pub title: String,
    /// `None` keeps the stored description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Card row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Replacement faces for an owned card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUpdate {
    /// New question side.
    pub front: String,
    /// New answer side.
    pub back: String,
    /// Mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Port for deck and card storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Count decks owned by `owner`.
    async fn count_decks(&self, owner: &OwnerId) -> Result<u64, DeckRepositoryError>;

    /// List decks owned by `owner`, most recently updated first.
    async fn list_decks(&self, owner: &OwnerId) -> Result<Vec<Deck>, DeckRepositoryError>;

    /// Fetch one deck if `owner` owns it.
    async fn find_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError>;

    /// Insert a deck and return it with its assigned identifier.
    async fn insert_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError>;

    /// Update a deck matched by id and owner; `None` when nothing matched.
    async fn update_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        update: &DeckUpdate,
    ) -> Result<Option<Deck>, DeckRepositoryError>;

    /// Delete a deck matched by id and owner, cascading to its cards.
    ///
    /// Returns `false` when nothing matched.
    async fn delete_deck(&self, owner: &OwnerId, deck_id: DeckId)
    -> Result<bool, DeckRepositoryError>;

    /// List the cards of an owned deck, newest first.
    async fn list_cards(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Vec<Card>, DeckRepositoryError>;

    /// Insert cards into a deck as one statement.
    ///
    /// Callers verify ownership first; a deck deleted in between surfaces as
    /// [`DeckRepositoryError::DeckNotFound`].
    async fn insert_cards(
        &self,
        deck_id: DeckId,
        cards: &[NewCard],
    ) -> Result<Vec<Card>, DeckRepositoryError>;

    /// Update a card matched by card id, deck id, and deck owner.
    async fn update_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
        update: &CardUpdate,
    ) -> Result<Option<Card>, DeckRepositoryError>;

    /// Delete a card matched by card id, deck id, and deck owner.
    async fn delete_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
    ) -> Result<bool, DeckRepositoryError>;

    /// Insert a deck and its cards in a single transaction.
    async fn insert_deck_with_cards(
        &self,
        deck: &NewDeck,
        cards: &[NewCard],
    ) -> Result<(Deck, Vec<Card>), DeckRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups come back empty and inserts echo their input with identifier 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDeckRepository;

fn echo_deck(deck: &NewDeck) -> Deck {
    Deck {
        id: DeckId::new(1),
        owner_id: deck.owner_id.clone(),
        title: deck.title.clone(),
        description: deck.description.clone(),
        created_at: deck.created_at,
        updated_at: deck.created_at,
    }
}

fn echo_cards(deck_id: DeckId, cards: &[NewCard]) -> Vec<Card> {
    cards
        .iter()
        .zip(1_i64..)
        .map(|(card, id)| Card {
            id: CardId::new(id),
            deck_id,
            front: card.front.clone(),
            back: card.back.clone(),
            created_at: card.created_at,
            updated_at: card.created_at,
        })
        .collect()
}

#[async_trait]
impl DeckRepository for FixtureDeckRepository {
    async fn count_decks(&self, _owner: &OwnerId) -> Result<u64, DeckRepositoryError> {
        Ok(0)
    }

    async fn list_decks(&self, _owner: &OwnerId) -> Result<Vec<Deck>, DeckRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_deck(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        Ok(None)
    }

    async fn insert_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        Ok(echo_deck(deck))
    }

    async fn update_deck(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
        _update: &DeckUpdate,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        Ok(None)
    }

    async fn delete_deck(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
    ) -> Result<bool, DeckRepositoryError> {
        Ok(false)
    }

    async fn list_cards(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert_cards(
        &self,
        deck_id: DeckId,
        cards: &[NewCard],
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        Ok(echo_cards(deck_id, cards))
    }

    async fn update_card(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
        _card_id: CardId,
        _update: &CardUpdate,
    ) -> Result<Option<Card>, DeckRepositoryError> {
        Ok(None)
    }

    async fn delete_card(
        &self,
        _owner: &OwnerId,
        _deck_id: DeckId,
        _card_id: CardId,
    ) -> Result<bool, DeckRepositoryError> {
        Ok(false)
    }

    async fn insert_deck_with_cards(
        &self,
        deck: &NewDeck,
        cards: &[NewCard],
    ) -> Result<(Deck, Vec<Card>), DeckRepositoryError> {
        let created = echo_deck(deck);
        let cards = echo_cards(created.id, cards);
        Ok((created, cards))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;

    fn owner() -> OwnerId {
        OwnerId::new("user_fixture").expect("owner id")
    }

    fn new_deck() -> NewDeck {
        NewDeck {
            owner_id: owner(),
            title: "Biology".to_owned(),
            description: None,
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[tokio::test]
    async fn fixture_lookups_are_empty() {
        let repo = FixtureDeckRepository;
        assert_eq!(repo.count_decks(&owner()).await.expect("count"), 0);
        assert!(repo.find_deck(&owner(), DeckId::new(1)).await.expect("find").is_none());
        assert!(!repo.delete_deck(&owner(), DeckId::new(1)).await.expect("delete"));
    }

    #[tokio::test]
    async fn fixture_insert_echoes_the_deck() {
        let repo = FixtureDeckRepository;
        let deck = repo.insert_deck(&new_deck()).await.expect("insert");
        assert_eq!(deck.title, "Biology");
        assert_eq!(deck.created_at, deck.updated_at);
    }

    #[test]
    fn errors_render_context() {
        let err = DeckRepositoryError::deck_not_found(5_i64);
        assert_eq!(err.to_string(), "deck 5 does not exist");
    }
}
