//! Caller identity and entitlement resolution.
//!
//! A [`CallerContext`] is resolved once per request and passed explicitly to
//! every pipeline operation. Capability checks go to the provider on every
//! call; nothing is cached between requests.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{EntitlementOracle, EntitlementOracleError, MetadataSubject};
use super::{Error, OwnerId, Principal};

const PRO_PLAN: &str = "pro";

/// A single capability the provider can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Organisation permission, e.g. `org:decks:generate`.
    Permission(&'static str),
    /// Organisation role, e.g. `org:admin`.
    Role(&'static str),
    /// Billing plan slug.
    Plan(&'static str),
    /// Billing feature slug.
    Feature(&'static str),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission(name) => write!(f, "permission:{name}"),
            Self::Role(name) => write!(f, "role:{name}"),
            Self::Plan(name) => write!(f, "plan:{name}"),
            Self::Feature(name) => write!(f, "feature:{name}"),
        }
    }
}

/// Named entitlements the pipeline gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entitlement {
    /// Create decks without the free-tier cap.
    UnlimitedDecks,
    /// Use AI generation.
    AiGeneration,
}

const UNLIMITED_DECKS: &[Capability] = &[
    Capability::Plan(PRO_PLAN),
    Capability::Feature("unlimited_decks"),
    Capability::Permission("org:decks:unlimited"),
    Capability::Role("org:admin"),
];

const AI_GENERATION: &[Capability] = &[
    Capability::Plan(PRO_PLAN),
    Capability::Feature("ai_flashcard_generation"),
    Capability::Permission("org:decks:generate"),
    Capability::Role("org:admin"),
];

impl Entitlement {
    /// Capabilities that each grant this entitlement, in check order.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::UnlimitedDecks => UNLIMITED_DECKS,
            Self::AiGeneration => AI_GENERATION,
        }
    }

    /// Stable name used in logs and error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnlimitedDecks => "unlimited_decks",
            Self::AiGeneration => "ai_generation",
        }
    }
}

fn map_oracle_error(error: EntitlementOracleError) -> Error {
    Error::service_unavailable(format!("entitlement check unavailable: {error}"))
}

fn is_pro(plan: Option<&str>) -> bool {
    plan == Some(PRO_PLAN)
}

/// Resolved caller for one request.
#[derive(Clone)]
pub struct CallerContext {
    principal: Principal,
    oracle: Arc<dyn EntitlementOracle>,
}

impl fmt::Debug for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerContext")
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

impl CallerContext {
    /// Bind a principal to the oracle that answers its capability checks.
    pub fn new(principal: Principal, oracle: Arc<dyn EntitlementOracle>) -> Self {
        Self { principal, oracle }
    }

    /// The authenticated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Identity that owns anything this caller creates.
    #[must_use]
    pub fn owner_id(&self) -> &OwnerId {
        &self.principal.user_id
    }

    /// Live capability check against the provider.
    ///
    /// # Errors
    /// Provider failures map to `service_unavailable`.
    pub async fn has_capability(&self, capability: &Capability) -> Result<bool, Error> {
        self.oracle
            .has_capability(&self.principal, capability)
            .await
            .map_err(map_oracle_error)
    }

    /// Whether the caller holds `entitlement`.
    ///
    /// Capabilities are checked in order and stop at the first grant. The
    /// legacy metadata fallback only runs when every capability was denied.
    ///
    /// # Errors
    /// Provider failures on the primary checks map to `service_unavailable`.
    pub async fn holds(&self, entitlement: Entitlement) -> Result<bool, Error> {
        for capability in entitlement.capabilities() {
            if self.has_capability(capability).await? {
                debug!(
                    owner_id = %self.principal.user_id,
                    entitlement = entitlement.as_str(),
                    %capability,
                    "entitlement granted"
                );
                return Ok(true);
            }
        }
        Ok(self.legacy_pro().await)
    }

    /// Legacy metadata check for accounts that predate plans and permissions.
    ///
    /// Provider failures are logged and read as "not pro".
    pub async fn legacy_pro(&self) -> bool {
        match self.lookup_legacy_plan().await {
            Ok(granted) => granted,
            Err(error) => {
                warn!(
                    owner_id = %self.principal.user_id,
                    %error,
                    "legacy plan lookup failed; treating caller as free tier"
                );
                false
            }
        }
    }

    async fn lookup_legacy_plan(&self) -> Result<bool, EntitlementOracleError> {
        let user_plan = self
            .oracle
            .plan_metadata(&MetadataSubject::User(self.principal.user_id.clone()))
            .await?;
        if is_pro(user_plan.as_deref()) {
            return Ok(true);
        }
        let Some(org_id) = &self.principal.org_id else {
            return Ok(false);
        };
        let org_plan = self
            .oracle
            .plan_metadata(&MetadataSubject::Organization(org_id.clone()))
            .await?;
        Ok(is_pro(org_plan.as_deref()))
    }
}

/// Turns the provider's view of a request into a [`CallerContext`].
#[derive(Clone)]
pub struct IdentityResolver {
    oracle: Arc<dyn EntitlementOracle>,
}

impl IdentityResolver {
    /// Resolver backed by `oracle` for capability checks.
    pub fn new(oracle: Arc<dyn EntitlementOracle>) -> Self {
        Self { oracle }
    }

    /// Resolve the caller, failing with `unauthorized` when nobody signed in.
    ///
    /// # Errors
    /// Returns `unauthorized` when `principal` is `None`.
    pub fn resolve(&self, principal: Option<Principal>) -> Result<CallerContext, Error> {
        principal
            .map(|principal| CallerContext::new(principal, Arc::clone(&self.oracle)))
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }
}
