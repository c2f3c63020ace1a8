//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `diesel
//! print-schema` against a migrated database regenerates them.

diesel::table! {
    /// Flashcard decks, one owner each.
    decks (id) {
        /// Primary key assigned by `BIGSERIAL`.
        id -> Int8,
        /// Opaque identity-provider user id.
        owner_id -> Text,
        /// Non-blank title.
        title -> Text,
        /// Optional description; blank input is stored as NULL.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp, written by the service clock.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cards, deleted with their deck.
    cards (id) {
        /// Primary key assigned by `BIGSERIAL`.
        id -> Int8,
        /// Parent deck (`ON DELETE CASCADE`).
        deck_id -> Int8,
        /// Question side.
        front -> Text,
        /// Answer side.
        back -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(cards -> decks (deck_id));
diesel::allow_tables_to_appear_in_same_query!(decks, cards);
