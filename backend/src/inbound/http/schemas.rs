//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No signed-in identity accompanied the request.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The free-tier deck cap has been reached.
    #[schema(rename = "quota_exceeded")]
    QuotaExceeded,
    /// The caller's plan does not include the feature.
    #[schema(rename = "entitlement_required")]
    EntitlementRequired,
    /// The resource does not exist or is owned by someone else.
    #[schema(rename = "not_found")]
    NotFound,
    /// The generation service failed or returned malformed content.
    #[schema(rename = "generation_failed")]
    GenerationFailed,
    /// A generated deck was saved but its cards were not.
    #[schema(rename = "partial_persistence")]
    PartialPersistence,
    /// A backing service is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Validation failures list every violated field under `details.fields`;
/// upgrade prompts carry `details.upgradePath`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "quota_exceeded")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "the free plan allows up to 3 decks; upgrade to create more")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
