//! Tests for deck HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{DeckDetail, DeckId, DescriptionUpdate, Error, MutationOutcome, ViewPath};
use crate::inbound::http::test_utils::{
    MockPorts, OWNER, card, deck, signed_in, test_app, violated_fields,
};

#[actix_web::test]
async fn anonymous_callers_are_rejected_before_the_service_runs() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let request = actix_test::TestRequest::get().uri("/api/v1/decks").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn list_returns_owned_decks() {
    let mut ports = MockPorts::default();
    ports
        .deck_queries
        .expect_list_decks()
        .withf(|caller| caller.owner_id().as_str() == OWNER)
        .times(1)
        .returning(|_| Ok(vec![deck(2, "Chemistry"), deck(1, "Biology")]));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::get().uri("/api/v1/decks")).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let titles: Vec<_> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|deck| deck["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Chemistry"), json!("Biology")]);
    assert_eq!(body[0]["ownerId"], OWNER);
}

#[actix_web::test]
async fn create_returns_location_invalidations_and_redirect() {
    let mut ports = MockPorts::default();
    ports
        .decks
        .expect_create_deck()
        .withf(|_, draft| draft.title.as_str() == "Biology" && draft.description.is_none())
        .times(1)
        .returning(|_, _| {
            Ok(MutationOutcome::new(deck(9, "Biology"), vec![ViewPath::DeckList])
                .redirect_to(ViewPath::DeckDetail(DeckId::new(9))))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::post().uri("/api/v1/decks"))
        .set_json(json!({ "title": "  Biology ", "description": "   " }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/api/v1/decks/9")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], 9);
    assert_eq!(body["invalidate"], json!(["/dashboard"]));
    assert_eq!(body["redirect"], "/dashboard/9");
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({ "title": "   " }), "blank_field")]
#[actix_web::test]
async fn create_rejects_missing_or_blank_titles(#[case] payload: Value, #[case] code: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let request = signed_in(actix_test::TestRequest::post().uri("/api/v1/decks"))
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["fields"][0]["code"], code);
}

#[actix_web::test]
async fn quota_failures_map_to_payment_required() {
    let mut ports = MockPorts::default();
    ports.decks.expect_create_deck().returning(|_, _| {
        Err(crate::domain::quota_exceeded(
            crate::domain::ResourceClass::Decks,
            3,
        ))
    });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::post().uri("/api/v1/decks"))
        .set_json(json!({ "title": "Fourth" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "quota_exceeded");
    assert_eq!(body["details"]["upgradePath"], "/pricing");
}

#[actix_web::test]
async fn malformed_json_uses_the_error_envelope() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let request = signed_in(actix_test::TestRequest::post().uri("/api/v1/decks"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn update_reports_path_and_body_violations_together() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let request = signed_in(actix_test::TestRequest::put().uri("/api/v1/decks/abc"))
        .set_json(json!({ "title": "" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(violated_fields(&body), vec!["deckId", "title"]);
}

#[rstest]
#[case(json!({ "title": "Renamed" }), DescriptionUpdate::Unchanged)]
#[case(json!({ "title": "Renamed", "description": "" }), DescriptionUpdate::Clear)]
#[actix_web::test]
async fn update_forwards_description_intent(
    #[case] payload: Value,
    #[case] expected: DescriptionUpdate,
) {
    let mut ports = MockPorts::default();
    ports
        .decks
        .expect_update_deck()
        .withf(move |_, deck_id, changes| {
            deck_id.get() == 4 && changes.title.as_str() == "Renamed" && changes.description == expected
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(MutationOutcome::new(
                deck(4, "Renamed"),
                vec![ViewPath::DeckList, ViewPath::DeckDetail(DeckId::new(4))],
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::put().uri("/api/v1/decks/4"))
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["invalidate"], json!(["/dashboard", "/dashboard/4"]));
    assert_eq!(body["redirect"], Value::Null);
}

#[actix_web::test]
async fn foreign_decks_read_as_not_found() {
    let mut ports = MockPorts::default();
    ports
        .deck_queries
        .expect_deck_detail()
        .returning(|_, _| Err(Error::not_found("deck not found")));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::get().uri("/api/v1/decks/77")).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn detail_includes_cards() {
    let mut ports = MockPorts::default();
    ports.deck_queries.expect_deck_detail().returning(|_, _| {
        Ok(DeckDetail {
            deck: deck(3, "Physics"),
            cards: vec![card(11, 3, "F = ?", "ma")],
        })
    });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::get().uri("/api/v1/decks/3")).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["deck"]["title"], "Physics");
    assert_eq!(body["cards"][0]["back"], "ma");
    assert_eq!(body["cards"][0]["deckId"], 3);
}

#[actix_web::test]
async fn delete_redirects_to_the_deck_list() {
    let mut ports = MockPorts::default();
    ports
        .decks
        .expect_delete_deck()
        .withf(|_, deck_id| deck_id.get() == 5)
        .times(1)
        .returning(|_, deck_id| {
            Ok(MutationOutcome::new(
                deck_id,
                vec![ViewPath::DeckList, ViewPath::DeckDetail(deck_id)],
            )
            .redirect_to(ViewPath::DeckList))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = signed_in(actix_test::TestRequest::delete().uri("/api/v1/decks/5")).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["deckId"], 5);
    assert_eq!(body["redirect"], "/dashboard");
}
