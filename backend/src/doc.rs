//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: deck, card, generation, entitlement, and health endpoints
//! - **Schemas**: request and response DTOs plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: bearer session tokens verified by the identity provider
//!
//! The generated document is served by Swagger UI in debug builds.

use crate::inbound::http::dto::{
    CardRequest, CardResponse, DeckDetailResponse, DeckRequest, DeckResponse,
    DeletedCardResponse, DeletedDeckResponse, EntitlementSummaryResponse, GenerateRequest,
    GeneratedCardsResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerSession",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Session token issued by the identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Flashdeck API",
        description = "Owner-scoped flashcard decks with plan-gated quotas and AI generation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerSession" = [])),
    paths(
        crate::inbound::http::decks::list_decks,
        crate::inbound::http::decks::get_deck,
        crate::inbound::http::decks::create_deck,
        crate::inbound::http::decks::update_deck,
        crate::inbound::http::decks::delete_deck,
        crate::inbound::http::cards::create_card,
        crate::inbound::http::cards::update_card,
        crate::inbound::http::cards::delete_card,
        crate::inbound::http::generation::generate_cards,
        crate::inbound::http::generation::generate_deck,
        crate::inbound::http::generation::create_deck_with_ai,
        crate::inbound::http::entitlements::get_entitlements,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        DeckRequest,
        CardRequest,
        GenerateRequest,
        DeckResponse,
        CardResponse,
        DeckDetailResponse,
        GeneratedCardsResponse,
        DeletedDeckResponse,
        DeletedCardResponse,
        EntitlementSummaryResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "decks", description = "Deck reads and manual mutations"),
        (name = "cards", description = "Card mutations inside an owned deck"),
        (name = "generation", description = "AI generation gated by plan"),
        (name = "entitlements", description = "Plan features and quota headroom"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn openapi_deck_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let deck = schemas.get("DeckResponse").expect("DeckResponse schema");

        assert_object_schema_has_field(deck, "ownerId");
        assert_object_schema_has_field(deck, "updatedAt");
    }

    #[test]
    fn openapi_documents_every_deck_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/decks",
            "/api/v1/decks/{deck_id}",
            "/api/v1/decks/{deck_id}/cards",
            "/api/v1/decks/{deck_id}/cards/{card_id}",
            "/api/v1/decks/{deck_id}/generate",
            "/api/v1/decks/generate",
            "/api/v1/decks/generate-from-outline",
            "/api/v1/me/entitlements",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerSession"));
    }
}
