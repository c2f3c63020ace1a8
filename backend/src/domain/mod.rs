//! Domain primitives, services, and ports.
//!
//! Purpose: hold the entitlement-gated deck pipeline independent of HTTP,
//! SQL, and the identity provider. Inbound adapters call the driving ports
//! in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and its stable codes.
//! - [`CallerContext`] / [`IdentityResolver`]: per-request caller and its
//!   capability checks.
//! - [`FreeTierQuota`]: read-then-act deck cap behind [`QuotaEnforcer`].
//! - [`DeckService`]: manual deck and card mutations plus reads.
//! - [`GenerationService`]: schema-validated AI generation.

mod deck;
mod decks;
mod entitlement;
pub mod error;
mod generation;
mod ids;
mod owner;
pub mod ports;
mod quota;
mod text;
mod trace_id;
mod views;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::deck::{
    Card, CardContent, Deck, DeckChanges, DeckDetail, DeckDraft, DescriptionUpdate,
};
pub use self::decks::DeckService;
pub use self::entitlement::{CallerContext, Capability, Entitlement, IdentityResolver};
pub use self::error::{Error, ErrorCode};
pub use self::generation::{
    DEFAULT_CARD_COUNT, GeneratedContent, GeneratedDeck, GenerationPersistence, GenerationService,
    OutputSchema, ParseGenerationPersistenceError, SchemaViolation, cards_prompt,
    deck_context_prompt, new_deck_prompt,
};
pub use self::ids::{CardId, DeckId, IdParseError};
pub use self::owner::{IdentityValidationError, OrgId, OwnerId, Principal};
#[cfg(test)]
pub use self::quota::MockQuotaEnforcer;
pub use self::quota::{
    DEFAULT_FREE_TIER_DECK_LIMIT, FreeTierQuota, QuotaEnforcer, ResourceClass, UPGRADE_PATH,
    quota_exceeded,
};
pub use self::text::{RequiredText, TextValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::views::{MutationOutcome, ViewPath};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
