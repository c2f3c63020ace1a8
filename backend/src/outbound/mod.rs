//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL deck repository using Diesel ORM
//! - **identity**: identity provider client for sessions and entitlements
//! - **generation**: structured-output generation over HTTP
//! - **cache**: Redis-backed view invalidation
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod generation;
mod http_preview;
pub mod identity;
pub mod persistence;
