//! Schema-validated AI generation.
//!
//! [`GenerationService`] gates every call on the AI generation entitlement,
//! asks the [`CardGenerator`] for output in a fixed [`OutputSchema`], and
//! only persists content that validated in full.
//!
//! [`CardGenerator`]: crate::domain::ports::CardGenerator

mod prompt;
mod schema;
mod service;

pub use prompt::{DEFAULT_CARD_COUNT, cards_prompt, deck_context_prompt, new_deck_prompt};
pub use schema::{GeneratedContent, GeneratedDeck, OutputSchema, SchemaViolation};
pub use service::{GenerationPersistence, GenerationService, ParseGenerationPersistenceError};

#[cfg(test)]
mod service_tests;
