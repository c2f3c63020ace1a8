//! Port for verifying caller session tokens.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{OwnerId, Principal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Provider could not be reached.
        Transport { message: String } =>
            "identity provider unreachable: {message}",
        /// Provider answered with an unexpected status or payload.
        Upstream { message: String } =>
            "identity provider error: {message}",
    }
}

/// Opaque bearer token presented by the caller. Wiped from memory on drop.
#[derive(Clone)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Wrap a non-blank token; blank input yields `None`.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Expose the token for transmission to the provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Port resolving a session token to the principal it was issued for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token`; `None` when the provider does not recognise it.
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Principal>, IdentityProviderError>;
}

/// Development identity provider that treats the token as the user id.
///
/// Never wire this into a deployment that accepts external traffic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Principal>, IdentityProviderError> {
        Ok(OwnerId::new(token.expose()).ok().map(Principal::user))
    }
}
