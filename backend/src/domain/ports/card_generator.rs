//! Port for the external structured-generation service.
//!
//! The service is slow, fallible, and untrusted for content. Adapters return
//! the raw JSON object they received; the domain validates it against the
//! requested [`OutputSchema`] before anything is persisted.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::OutputSchema;

use super::define_port_error;

define_port_error! {
    /// Errors raised by generation adapters.
    pub enum CardGeneratorError {
        /// No generation backend is configured.
        Disabled => "generation service is not configured",
        /// Request could not be delivered or the connection dropped.
        Transport { message: String } =>
            "generation service transport failed: {message}",
        /// The configured client timeout elapsed.
        Timeout { message: String } =>
            "generation service timed out: {message}",
        /// The service answered with a non-success status.
        Upstream { message: String } =>
            "generation service rejected the request: {message}",
        /// The response body was not a JSON object.
        Decode { message: String } =>
            "generation service returned an unreadable payload: {message}",
    }
}

/// Prompt plus the shape the output must take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Instruction text sent to the model.
    pub prompt: String,
    /// Required output structure.
    pub schema: OutputSchema,
}

/// Port for structured generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardGenerator: Send + Sync {
    /// Run the request and return the unvalidated JSON object.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, CardGeneratorError>;
}

/// Generator used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCardGenerator;

#[async_trait]
impl CardGenerator for DisabledCardGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, CardGeneratorError> {
        Err(CardGeneratorError::disabled())
    }
}

/// Fixture generator returning canned, schema-valid payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCardGenerator;

fn fixture_cards(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| json!({ "front": format!("Question {n}"), "back": format!("Answer {n}") }))
        .collect()
}

#[async_trait]
impl CardGenerator for FixtureCardGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, CardGeneratorError> {
        Ok(match request.schema {
            OutputSchema::Flashcards => json!({ "flashcards": fixture_cards(3) }),
            OutputSchema::Deck => json!({
                "title": "Fixture deck",
                "description": "Generated without a model",
                "cards": fixture_cards(OutputSchema::DECK_MIN_CARDS),
            }),
        })
    }
}
