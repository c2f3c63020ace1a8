//! Port for live entitlement checks against the identity/billing provider.
//!
//! Answers are never cached across requests: plans and roles can change
//! between two calls from the same caller.

use async_trait::async_trait;

use crate::domain::{Capability, OrgId, OwnerId, Principal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entitlement oracle adapters.
    pub enum EntitlementOracleError {
        /// Provider could not be reached.
        Transport { message: String } =>
            "entitlement provider unreachable: {message}",
        /// Provider answered with an unexpected status or payload.
        Upstream { message: String } =>
            "entitlement provider error: {message}",
    }
}

/// Subject whose stored metadata the legacy plan lookup reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSubject {
    /// A user account.
    User(OwnerId),
    /// An organisation.
    Organization(OrgId),
}

/// Port answering capability questions for a principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitlementOracle: Send + Sync {
    /// Whether `principal` currently holds `capability`.
    async fn has_capability(
        &self,
        principal: &Principal,
        capability: &Capability,
    ) -> Result<bool, EntitlementOracleError>;

    /// The `plan` marker stored in the subject's public metadata, if any.
    ///
    /// Accounts provisioned before plans and permissions existed carry their
    /// tier only here.
    async fn plan_metadata(
        &self,
        subject: &MetadataSubject,
    ) -> Result<Option<String>, EntitlementOracleError>;
}

/// Fixture oracle granting nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntitlementOracle;

#[async_trait]
impl EntitlementOracle for FixtureEntitlementOracle {
    async fn has_capability(
        &self,
        _principal: &Principal,
        _capability: &Capability,
    ) -> Result<bool, EntitlementOracleError> {
        Ok(false)
    }

    async fn plan_metadata(
        &self,
        _subject: &MetadataSubject,
    ) -> Result<Option<String>, EntitlementOracleError> {
        Ok(None)
    }
}
