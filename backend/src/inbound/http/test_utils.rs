//! Test helpers for inbound HTTP components.
//!
//! Handlers are exercised against mocked driving ports. The fixture identity
//! provider treats the bearer token as the user id, so `Bearer user_owner`
//! signs in as [`OWNER`].

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::ports::{
    FixtureEntitlementOracle, FixtureIdentityProvider, MockDeckCommand, MockDeckQuery,
    MockGenerationCommand,
};
pub(crate) use crate::domain::test_fixtures::{OWNER, card, deck, owner};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Driving port mocks; any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub(crate) decks: MockDeckCommand,
    pub(crate) deck_queries: MockDeckQuery,
    pub(crate) generation: MockGenerationCommand,
}

/// Build the `/api/v1` application around `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(HttpStatePorts {
        decks: Arc::new(ports.decks),
        deck_queries: Arc::new(ports.deck_queries),
        generation: Arc::new(ports.generation),
        identity: Arc::new(FixtureIdentityProvider),
        entitlements: Arc::new(FixtureEntitlementOracle),
    });
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Attach the owner's bearer token.
pub(crate) fn signed_in(request: TestRequest) -> TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {OWNER}")))
}

/// Field names listed under `details.fields` of an error body.
pub(crate) fn violated_fields(body: &Value) -> Vec<String> {
    body.pointer("/details/fields")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|field| field.get("field").and_then(Value::as_str))
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
