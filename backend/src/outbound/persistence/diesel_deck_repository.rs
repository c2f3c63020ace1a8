//! PostgreSQL-backed `DeckRepository` implementation using Diesel ORM.
//!
//! Every statement that touches an existing deck carries the owner predicate,
//! so a foreign deck and a missing deck are indistinguishable here.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    CardUpdate, DeckRepository, DeckRepositoryError, DeckUpdate, NewCard, NewDeck,
};
use crate::domain::{Card, CardId, Deck, DeckId, OwnerId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CardChangeset, CardRow, DeckChangeset, DeckRow, NewCardRow, NewDeckRow,
};
use super::pool::DbPool;
use super::schema::{cards, decks};

/// Diesel-backed implementation of the deck repository port.
#[derive(Clone)]
pub struct DieselDeckRepository {
    pool: DbPool,
}

impl DieselDeckRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_deck(row: DeckRow) -> Result<Deck, DeckRepositoryError> {
    Deck::try_from(row).map_err(|err| DeckRepositoryError::query(format!("decode deck: {err}")))
}

fn new_deck_row(deck: &NewDeck) -> NewDeckRow<'_> {
    NewDeckRow {
        owner_id: deck.owner_id.as_str(),
        title: &deck.title,
        description: deck.description.as_deref(),
        created_at: deck.created_at,
        updated_at: deck.created_at,
    }
}

fn new_card_rows(deck_id: DeckId, cards: &[NewCard]) -> Vec<NewCardRow<'_>> {
    cards
        .iter()
        .map(|card| NewCardRow {
            deck_id: deck_id.get(),
            front: &card.front,
            back: &card.back,
            created_at: card.created_at,
            updated_at: card.created_at,
        })
        .collect()
}

/// Subquery selecting the ids of decks owned by `owner`.
macro_rules! owned_deck_ids {
    ($owner:expr) => {
        decks::table
            .filter(decks::owner_id.eq($owner.as_str()))
            .select(decks::id)
    };
}

#[async_trait]
impl DeckRepository for DieselDeckRepository {
    async fn count_decks(&self, owner: &OwnerId) -> Result<u64, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = decks::table
            .filter(decks::owner_id.eq(owner.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        u64::try_from(count)
            .map_err(|_| DeckRepositoryError::query(format!("negative deck count {count}")))
    }

    async fn list_decks(&self, owner: &OwnerId) -> Result<Vec<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DeckRow> = decks::table
            .filter(decks::owner_id.eq(owner.as_str()))
            .order((decks::updated_at.desc(), decks::id.desc()))
            .select(DeckRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(to_deck).collect()
    }

    async fn find_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = decks::table
            .filter(decks::id.eq(deck_id.get()))
            .filter(decks::owner_id.eq(owner.as_str()))
            .select(DeckRow::as_select())
            .first::<DeckRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(to_deck).transpose()
    }

    async fn insert_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DeckRow = diesel::insert_into(decks::table)
            .values(&new_deck_row(deck))
            .returning(DeckRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        to_deck(row)
    }

    async fn update_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        update: &DeckUpdate,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = DeckChangeset {
            title: &update.title,
            description: update.description.as_ref().map(Option::as_deref),
            updated_at: update.updated_at,
        };
        let row = diesel::update(
            decks::table
                .filter(decks::id.eq(deck_id.get()))
                .filter(decks::owner_id.eq(owner.as_str())),
        )
        .set(&changeset)
        .returning(DeckRow::as_returning())
        .get_result::<DeckRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, None))?;
        row.map(to_deck).transpose()
    }

    async fn delete_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            decks::table
                .filter(decks::id.eq(deck_id.get()))
                .filter(decks::owner_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }

    async fn list_cards(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CardRow> = cards::table
            .inner_join(decks::table)
            .filter(cards::deck_id.eq(deck_id.get()))
            .filter(decks::owner_id.eq(owner.as_str()))
            .order((cards::created_at.desc(), cards::id.desc()))
            .select(CardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn insert_cards(
        &self,
        deck_id: DeckId,
        cards: &[NewCard],
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        if cards.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CardRow> = diesel::insert_into(cards::table)
            .values(&new_card_rows(deck_id, cards))
            .returning(CardRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(deck_id)))?;
        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn update_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
        update: &CardUpdate,
    ) -> Result<Option<Card>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = CardChangeset {
            front: &update.front,
            back: &update.back,
            updated_at: update.updated_at,
        };
        let row = diesel::update(
            cards::table
                .filter(cards::id.eq(card_id.get()))
                .filter(cards::deck_id.eq(deck_id.get()))
                .filter(cards::deck_id.eq_any(owned_deck_ids!(owner))),
        )
        .set(&changeset)
        .returning(CardRow::as_returning())
        .get_result::<CardRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(row.map(Card::from))
    }

    async fn delete_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            cards::table
                .filter(cards::id.eq(card_id.get()))
                .filter(cards::deck_id.eq(deck_id.get()))
                .filter(cards::deck_id.eq_any(owned_deck_ids!(owner))),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }

    async fn insert_deck_with_cards(
        &self,
        deck: &NewDeck,
        cards: &[NewCard],
    ) -> Result<(Deck, Vec<Card>), DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deck_row = new_deck_row(deck);
        let (created, card_rows) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let created: DeckRow = diesel::insert_into(decks::table)
                        .values(&deck_row)
                        .returning(DeckRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if cards.is_empty() {
                        return Ok((created, Vec::new()));
                    }
                    let card_rows: Vec<CardRow> = diesel::insert_into(cards::table)
                        .values(&new_card_rows(DeckId::new(created.id), cards))
                        .returning(CardRow::as_returning())
                        .get_results(conn)
                        .await?;
                    Ok((created, card_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        let created = to_deck(created)?;
        Ok((created, card_rows.into_iter().map(Card::from).collect()))
    }
}
