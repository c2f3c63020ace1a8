//! Tests for the generation service.

use std::sync::Arc;

use rstest::rstest;
use serde_json::{Value, json};

use super::{GenerationPersistence, GenerationService, OutputSchema};
use crate::domain::ports::{
    CardGeneratorError, DeckRepositoryError, GenerationCommand, MockCardGenerator,
    MockDeckRepository, MockViewCache,
};
use crate::domain::test_fixtures::{
    accepting_views, caller, card, deck, fixed_clock, owner, quota,
};
use crate::domain::{Card, DeckDraft, DeckId, ErrorCode, RequiredText, ViewPath};

fn cards_payload(count: usize) -> Value {
    let cards: Vec<Value> = (0..count)
        .map(|n| json!({ "front": format!("Q{n}"), "back": format!("A{n}") }))
        .collect();
    json!({ "flashcards": cards })
}

fn deck_payload(count: usize) -> Value {
    let cards: Vec<Value> = (0..count)
        .map(|n| json!({ "front": format!("Q{n}"), "back": format!("A{n}") }))
        .collect();
    json!({ "title": "Mitochondria", "description": "Energy", "cards": cards })
}

fn generator_returning(payload: Value) -> MockCardGenerator {
    let mut generator = MockCardGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .return_once(move |_| Ok(payload));
    generator
}

fn echo_inserted(deck_id: DeckId, count: usize) -> Vec<Card> {
    (0..count)
        .map(|n| card(100 + n as i64, deck_id.get(), "Q", "A"))
        .collect()
}

fn make_service(
    repo: MockDeckRepository,
    generator: MockCardGenerator,
    quota_allows: bool,
    views: MockViewCache,
) -> GenerationService<MockDeckRepository> {
    GenerationService::new(
        Arc::new(repo),
        Arc::new(generator),
        quota(quota_allows),
        Arc::new(views),
        fixed_clock(),
    )
}

fn text(raw: &str) -> RequiredText {
    RequiredText::new(raw).expect("non-blank")
}

#[tokio::test]
async fn generation_requires_the_entitlement_before_touching_the_deck() {
    let mut repo = MockDeckRepository::new();
    repo.expect_find_deck().never();
    let mut generator = MockCardGenerator::new();
    generator.expect_generate().never();

    let err = make_service(repo, generator, true, accepting_views())
        .generate_cards(&caller(false), DeckId::new(1), None)
        .await
        .expect_err("entitlement required");

    assert_eq!(err.code(), ErrorCode::EntitlementRequired);
    assert_eq!(err.details().expect("details")["upgradePath"], "/pricing");
}

#[tokio::test]
async fn generate_cards_uses_the_deck_template_when_no_prompt_is_given() {
    let mut repo = MockDeckRepository::new();
    repo.expect_find_deck()
        .return_once(|_, _| Ok(Some(deck(3, "Cell biology"))));
    repo.expect_insert_cards()
        .times(1)
        .withf(|id, batch| *id == DeckId::new(3) && batch.len() == 4)
        .return_once(|id, _| Ok(echo_inserted(id, 4)));
    let mut generator = MockCardGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .withf(|request| {
            request.schema == OutputSchema::Flashcards
                && request.prompt.contains("titled \"Cell biology\"")
        })
        .return_once(|_| Ok(cards_payload(4)));

    let outcome = make_service(repo, generator, true, accepting_views())
        .generate_cards(&caller(true), DeckId::new(3), Some("  ".to_owned()))
        .await
        .expect("cards generated");

    assert_eq!(outcome.value.cards.len(), 4);
    assert_eq!(outcome.invalidated, vec![ViewPath::DeckDetail(DeckId::new(3))]);
}

#[tokio::test]
async fn empty_generation_is_a_no_op() {
    let mut repo = MockDeckRepository::new();
    repo.expect_find_deck()
        .return_once(|_, _| Ok(Some(deck(3, "Cells"))));
    repo.expect_insert_cards().never();
    let mut views = MockViewCache::new();
    views.expect_invalidate().never();

    let outcome = make_service(repo, generator_returning(cards_payload(0)), true, views)
        .generate_cards(&caller(true), DeckId::new(3), Some("verbs".to_owned()))
        .await
        .expect("empty result is not an error");

    assert!(outcome.value.cards.is_empty());
    assert!(outcome.invalidated.is_empty());
}

#[tokio::test]
async fn malformed_output_persists_nothing() {
    let mut repo = MockDeckRepository::new();
    repo.expect_find_deck()
        .return_once(|_, _| Ok(Some(deck(3, "Cells"))));
    repo.expect_insert_cards().never();
    let payload = json!({ "flashcards": [{ "front": "Q", "back": "" }] });

    let err = make_service(repo, generator_returning(payload), true, accepting_views())
        .generate_cards(&caller(true), DeckId::new(3), None)
        .await
        .expect_err("blank back rejected");

    assert_eq!(err.code(), ErrorCode::GenerationFailed);
    assert_eq!(err.details().expect("details")["schema"], "flashcards");
}

#[rstest]
#[case(CardGeneratorError::disabled())]
#[case(CardGeneratorError::timeout("30s elapsed"))]
#[case(CardGeneratorError::upstream("status 500"))]
#[tokio::test]
async fn generator_failures_surface_as_generation_failed(#[case] failure: CardGeneratorError) {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert_deck().never();
    let mut generator = MockCardGenerator::new();
    generator
        .expect_generate()
        .return_once(move |_| Err(failure));

    let err = make_service(repo, generator, true, accepting_views())
        .generate_deck(&caller(true), text("photosynthesis"))
        .await
        .expect_err("generator failed");

    assert_eq!(err.code(), ErrorCode::GenerationFailed);
}

#[tokio::test]
async fn generate_deck_respects_the_quota() {
    let mut generator = MockCardGenerator::new();
    generator.expect_generate().never();

    let err = make_service(MockDeckRepository::new(), generator, false, accepting_views())
        .generate_deck(&caller(true), text("photosynthesis"))
        .await
        .expect_err("over cap");

    assert_eq!(err.code(), ErrorCode::QuotaExceeded);
}

#[tokio::test]
async fn generate_deck_persists_deck_then_cards() {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert_deck()
        .times(1)
        .withf(|new_deck| {
            new_deck.title == "Mitochondria"
                && new_deck.description.as_deref() == Some("Energy")
                && new_deck.owner_id == owner()
        })
        .return_once(|_| Ok(deck(21, "Mitochondria")));
    repo.expect_insert_cards()
        .times(1)
        .withf(|id, batch| *id == DeckId::new(21) && batch.len() == 7)
        .return_once(|id, _| Ok(echo_inserted(id, 7)));
    repo.expect_insert_deck_with_cards().never();
    let mut views = MockViewCache::new();
    views
        .expect_invalidate()
        .times(1)
        .withf(|paths| paths == [ViewPath::DeckList])
        .returning(|_| Ok(()));

    let outcome = make_service(repo, generator_returning(deck_payload(7)), true, views)
        .generate_deck(&caller(true), text("cellular respiration"))
        .await
        .expect("deck generated");

    assert_eq!(outcome.value.cards.len(), 7);
    assert_eq!(outcome.redirect, Some(ViewPath::DeckDetail(DeckId::new(21))));
}

#[tokio::test]
async fn failed_card_insert_reports_partial_persistence() {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert_deck()
        .return_once(|_| Ok(deck(22, "Mitochondria")));
    repo.expect_insert_cards()
        .return_once(|_, _| Err(DeckRepositoryError::query("deadlock detected")));
    let mut views = MockViewCache::new();
    views
        .expect_invalidate()
        .times(1)
        .withf(|paths| paths == [ViewPath::DeckList])
        .returning(|_| Ok(()));

    let err = make_service(repo, generator_returning(deck_payload(5)), true, views)
        .generate_deck(&caller(true), text("cellular respiration"))
        .await
        .expect_err("partial");

    assert_eq!(err.code(), ErrorCode::PartialPersistence);
    assert_eq!(err.details().expect("details")["deckId"], 22);
}

#[tokio::test]
async fn transactional_mode_writes_deck_and_cards_together() {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert_deck().never();
    repo.expect_insert_cards().never();
    repo.expect_insert_deck_with_cards()
        .times(1)
        .withf(|_, batch| batch.len() == 6)
        .return_once(|_, _| Ok((deck(23, "Mitochondria"), echo_inserted(DeckId::new(23), 6))));

    let outcome = make_service(repo, generator_returning(deck_payload(6)), true, accepting_views())
        .with_persistence(GenerationPersistence::Transactional)
        .generate_deck(&caller(true), text("cellular respiration"))
        .await
        .expect("deck generated");

    assert_eq!(outcome.value.deck.id, DeckId::new(23));
}

#[tokio::test]
async fn create_deck_with_ai_keeps_the_outline_and_tolerates_no_cards() {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert_deck()
        .times(1)
        .withf(|new_deck| new_deck.title == "Kanji" && new_deck.description.is_none())
        .return_once(|_| Ok(deck(30, "Kanji")));
    repo.expect_insert_cards().never();
    let mut generator = MockCardGenerator::new();
    generator
        .expect_generate()
        .withf(|request| request.prompt.contains("titled \"Kanji\""))
        .return_once(|_| Ok(cards_payload(0)));

    let outcome = make_service(repo, generator, true, accepting_views())
        .create_deck_with_ai(&caller(true), DeckDraft::new(text("Kanji"), Some("")))
        .await
        .expect("deck created");

    assert_eq!(outcome.value.deck.id, DeckId::new(30));
    assert!(outcome.value.cards.is_empty());
    assert_eq!(outcome.redirect, Some(ViewPath::DeckDetail(DeckId::new(30))));
}

#[rstest]
#[case("sequential", GenerationPersistence::Sequential)]
#[case(" Transactional ", GenerationPersistence::Transactional)]
fn persistence_modes_parse(#[case] raw: &str, #[case] expected: GenerationPersistence) {
    assert_eq!(raw.parse::<GenerationPersistence>().expect("known mode"), expected);
}

#[test]
fn unknown_persistence_modes_are_rejected() {
    assert!("eventually".parse::<GenerationPersistence>().is_err());
}
