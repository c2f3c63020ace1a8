//! Step definitions shared by the deck behaviour suites.

use flashdeck::domain::ViewPath;
use rstest_bdd_macros::{given, then};
use serde_json::Value;

use crate::deck_world::DeckWorld;

#[given("a free tier caller {name}")]
fn a_free_tier_caller(world: &DeckWorld, name: String) {
    world.add_free_caller(&name);
}

#[given("a pro caller {name}")]
fn a_pro_caller(world: &DeckWorld, name: String) {
    world.add_pro_caller(&name);
}

#[given("{owner} has a deck named {deck} with {count} cards")]
fn owner_has_a_deck_with_cards(world: &DeckWorld, owner: String, deck: String, count: usize) {
    world.seed_deck(&owner, &deck, count);
}

#[then("{owner} owns {count} decks")]
fn owner_owns_decks(world: &DeckWorld, owner: String, count: usize) {
    assert_eq!(world.owned_deck_count(&owner), count);
}

#[then("the last request fails with {code}")]
fn the_last_request_fails_with(world: &DeckWorld, code: String) {
    world.assert_failed_with(&code);
}

#[then("deck {deck} holds {count} cards")]
fn deck_holds_cards(world: &DeckWorld, deck: String, count: usize) {
    let deck_id = world.deck_id(&deck);
    assert_eq!(world.repo.cards_in(deck_id).len(), count);
}

#[then("the deck list view was invalidated")]
fn the_deck_list_view_was_invalidated(world: &DeckWorld) {
    let batches = world.views.batches();
    let last = batches.last().expect("an invalidation batch");
    assert!(last.contains(&ViewPath::DeckList), "last batch: {last:?}");
}

pub(crate) fn failure_details(world: &DeckWorld) -> Value {
    world
        .last_error
        .borrow()
        .as_ref()
        .and_then(|error| error.details().cloned())
        .expect("failure details")
}
