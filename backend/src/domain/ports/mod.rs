//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`DeckRepository`, `EntitlementOracle`, `IdentityProvider`,
//! `CardGenerator`, `ViewCache`) are implemented by outbound adapters. Driving
//! ports (`DeckCommand`, `DeckQuery`, `GenerationCommand`) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod card_generator;
mod deck_command;
mod deck_query;
mod deck_repository;
mod entitlement_oracle;
mod generation_command;
mod identity_provider;
mod view_cache;

#[cfg(test)]
pub use card_generator::MockCardGenerator;
pub use card_generator::{
    CardGenerator, CardGeneratorError, DisabledCardGenerator, FixtureCardGenerator,
    GenerationRequest,
};
pub use deck_command::DeckCommand;
#[cfg(test)]
pub use deck_command::MockDeckCommand;
#[cfg(test)]
pub use deck_query::MockDeckQuery;
pub use deck_query::{DeckQuery, EntitlementSummary};
#[cfg(test)]
pub use deck_repository::MockDeckRepository;
pub use deck_repository::{
    CardUpdate, DeckRepository, DeckRepositoryError, DeckUpdate, FixtureDeckRepository, NewCard,
    NewDeck,
};
#[cfg(test)]
pub use entitlement_oracle::MockEntitlementOracle;
pub use entitlement_oracle::{
    EntitlementOracle, EntitlementOracleError, FixtureEntitlementOracle, MetadataSubject,
};
#[cfg(test)]
pub use generation_command::MockGenerationCommand;
pub use generation_command::{GeneratedCards, GenerationCommand};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FixtureIdentityProvider, IdentityProvider, IdentityProviderError, SessionToken,
};
#[cfg(test)]
pub use view_cache::MockViewCache;
pub use view_cache::{NoOpViewCache, ViewCache, ViewCacheError};
