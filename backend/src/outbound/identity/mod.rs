//! Identity provider outbound adapter.
//!
//! Implements both `IdentityProvider` (session verification) and
//! `EntitlementOracle` (capability checks and legacy plan metadata) over the
//! provider's REST API.

mod dto;
mod http_client;

pub use http_client::{HttpIdentityClient, IdentityClientBuildError, IdentityClientConfig};
