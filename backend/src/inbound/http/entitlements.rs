//! Entitlement summary handler.
//!
//! ```text
//! GET /api/v1/me/entitlements
//! ```

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::EntitlementSummaryResponse;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Report what the caller may do: plan features, deck usage, and headroom.
#[utoipa::path(
    get,
    path = "/api/v1/me/entitlements",
    responses(
        (status = 200, description = "Entitlement summary", body = EntitlementSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Provider unavailable", body = ErrorSchema)
    ),
    tags = ["entitlements"],
    operation_id = "getEntitlements"
)]
#[get("/me/entitlements")]
pub async fn get_entitlements(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<EntitlementSummaryResponse>> {
    let summary = state.deck_queries.entitlement_summary(&caller.0).await?;
    Ok(web::Json(summary.into()))
}
