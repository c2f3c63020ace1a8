//! Shared builders for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use crate::domain::ports::{MockEntitlementOracle, MockViewCache};
use crate::domain::{
    CallerContext, Card, CardId, Deck, DeckId, OwnerId, Principal, QuotaEnforcer,
    quota::MockQuotaEnforcer,
};

pub(crate) const OWNER: &str = "user_owner";

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixed_time());
    Arc::new(clock)
}

pub(crate) fn owner() -> OwnerId {
    OwnerId::new(OWNER).expect("owner id")
}

/// Caller whose capability checks all answer `granted`.
pub(crate) fn caller(granted: bool) -> CallerContext {
    let mut oracle = MockEntitlementOracle::new();
    oracle
        .expect_has_capability()
        .returning(move |_, _| Ok(granted));
    oracle.expect_plan_metadata().returning(|_| Ok(None));
    CallerContext::new(Principal::user(owner()), Arc::new(oracle))
}

pub(crate) fn quota(allowed: bool) -> Arc<dyn QuotaEnforcer> {
    let mut quota = MockQuotaEnforcer::new();
    quota.expect_can_create().returning(move |_, _| Ok(allowed));
    quota.expect_limit().return_const(3_u32);
    Arc::new(quota)
}

pub(crate) fn accepting_views() -> MockViewCache {
    let mut views = MockViewCache::new();
    views.expect_invalidate().returning(|_| Ok(()));
    views
}

pub(crate) fn deck(id: i64, title: &str) -> Deck {
    Deck {
        id: DeckId::new(id),
        owner_id: owner(),
        title: title.to_owned(),
        description: None,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn card(id: i64, deck_id: i64, front: &str, back: &str) -> Card {
    Card {
        id: CardId::new(id),
        deck_id: DeckId::new(deck_id),
        front: front.to_owned(),
        back: back.to_owned(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}
