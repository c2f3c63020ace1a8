//! Free-tier resource caps.
//!
//! [`FreeTierQuota`] counts existing decks and then lets the caller insert.
//! The count and the insert are separate statements, so two concurrent
//! creates by one owner can both pass at `limit - 1`. An implementation that
//! reserves atomically can replace it behind [`QuotaEnforcer`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::ports::DeckRepository;
use super::{CallerContext, Entitlement, Error};

/// Default free-tier deck cap.
pub const DEFAULT_FREE_TIER_DECK_LIMIT: u32 = 3;

/// Where callers go to lift a cap or unlock a feature.
pub const UPGRADE_PATH: &str = "/pricing";

/// Resource classes subject to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// Decks owned by one identity.
    Decks,
}

impl ResourceClass {
    /// Stable name for logs and error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decks => "decks",
        }
    }
}

/// Decides whether a new resource may be created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaEnforcer: Send + Sync {
    /// Whether `caller` may create one more resource of `class`.
    ///
    /// # Errors
    /// Fails closed: when usage cannot be determined the call errors rather
    /// than allowing the create.
    async fn can_create(&self, caller: &CallerContext, class: ResourceClass)
    -> Result<bool, Error>;

    /// Cap applied to callers without the unlimited entitlement.
    fn limit(&self, class: ResourceClass) -> u32;
}

/// Error returned when a create is denied by the cap.
#[must_use]
pub fn quota_exceeded(class: ResourceClass, limit: u32) -> Error {
    Error::quota_exceeded(format!(
        "the free plan allows up to {limit} {}; upgrade to create more",
        class.as_str()
    ))
    .with_details(json!({
        "resource": class.as_str(),
        "limit": limit,
        "upgradePath": UPGRADE_PATH,
    }))
}

/// Read-then-act quota over the deck repository.
pub struct FreeTierQuota<R> {
    repo: Arc<R>,
    deck_limit: u32,
}

impl<R> FreeTierQuota<R> {
    /// Quota with the default cap.
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_limit(repo, DEFAULT_FREE_TIER_DECK_LIMIT)
    }

    /// Quota with an explicit cap.
    pub fn with_limit(repo: Arc<R>, deck_limit: u32) -> Self {
        Self { repo, deck_limit }
    }
}

#[async_trait]
impl<R> QuotaEnforcer for FreeTierQuota<R>
where
    R: DeckRepository,
{
    async fn can_create(
        &self,
        caller: &CallerContext,
        class: ResourceClass,
    ) -> Result<bool, Error> {
        if caller.holds(Entitlement::UnlimitedDecks).await? {
            return Ok(true);
        }
        let ResourceClass::Decks = class;
        let count = self
            .repo
            .count_decks(caller.owner_id())
            .await
            .map_err(|error| {
                warn!(
                    owner_id = %caller.owner_id(),
                    %error,
                    "deck count failed; rejecting create"
                );
                Error::service_unavailable("unable to verify deck quota")
            })?;
        let allowed = count < u64::from(self.deck_limit);
        debug!(
            owner_id = %caller.owner_id(),
            count,
            limit = self.deck_limit,
            allowed,
            "free-tier quota evaluated"
        );
        Ok(allowed)
    }

    fn limit(&self, _class: ResourceClass) -> u32 {
        self.deck_limit
    }
}
