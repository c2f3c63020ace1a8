//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the deck repository port backed by PostgreSQL
//! via Diesel with async support through `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Ownership predicates live in the SQL, not in Rust filters.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool errors map to
//!   [`DeckRepositoryError`](crate::domain::ports::DeckRepositoryError).
//!
//! # Example
//!
//! ```ignore
//! use flashdeck::outbound::persistence::{DbPool, DieselDeckRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/flashdeck")).await?;
//! let repo = DieselDeckRepository::new(pool);
//! ```

mod diesel_deck_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_deck_repository::DieselDeckRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
