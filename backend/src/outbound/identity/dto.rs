//! Wire types for the identity provider's backend API.

use serde::{Deserialize, Serialize};

use crate::domain::{OrgId, OwnerId};

#[derive(Debug, Serialize)]
pub(super) struct VerifySessionRequest<'a> {
    pub(super) token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifiedSession {
    pub(super) user_id: OwnerId,
    #[serde(default)]
    pub(super) org_id: Option<OrgId>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthorizationCheck<'a> {
    pub(super) user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) org_id: Option<&'a str>,
    pub(super) kind: &'static str,
    pub(super) name: &'static str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorizationDecision {
    pub(super) allowed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PublicMetadata {
    #[serde(default)]
    pub(super) plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubjectRecord {
    #[serde(default)]
    pub(super) public_metadata: PublicMetadata,
}
