//! Reqwest-backed identity provider client.
//!
//! One client serves both session verification and live entitlement checks.
//! Every call is made with the backend secret key; nothing is cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    AuthorizationCheck, AuthorizationDecision, SubjectRecord, VerifiedSession,
    VerifySessionRequest,
};
use crate::domain::ports::{
    EntitlementOracle, EntitlementOracleError, IdentityProvider, IdentityProviderError,
    MetadataSubject, SessionToken,
};
use crate::domain::{Capability, Principal};
use crate::outbound::http_preview::status_message;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity provider client settings.
pub struct IdentityClientConfig {
    /// API base URL, e.g. `https://api.identity.example`.
    pub base_url: Url,
    /// Backend secret key.
    pub secret_key: Zeroizing<String>,
}

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
#[error("identity client: {0}")]
pub struct IdentityClientBuildError(#[from] reqwest::Error);

/// HTTP client for the identity provider.
pub struct HttpIdentityClient {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

/// Failure of one provider call, before port-specific mapping.
#[derive(Debug)]
enum CallError {
    Transport(String),
    Upstream(String),
}

impl From<CallError> for IdentityProviderError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Transport(message) => Self::transport(message),
            CallError::Upstream(message) => Self::upstream(message),
        }
    }
}

impl From<CallError> for EntitlementOracleError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Transport(message) => Self::transport(message),
            CallError::Upstream(message) => Self::upstream(message),
        }
    }
}

fn capability_parts(capability: &Capability) -> (&'static str, &'static str) {
    match *capability {
        Capability::Permission(name) => ("permission", name),
        Capability::Role(name) => ("role", name),
        Capability::Plan(name) => ("plan", name),
        Capability::Feature(name) => ("feature", name),
    }
}

/// Metadata URL for `subject`, with the id percent-encoded as one segment.
fn metadata_url(base_url: &Url, subject: &MetadataSubject) -> Result<Url, CallError> {
    let (collection, id) = match subject {
        MetadataSubject::User(id) => ("users", id.as_str()),
        MetadataSubject::Organization(id) => ("organizations", id.as_str()),
    };
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| CallError::Transport(format!("invalid provider URL: {base_url}")))?
        .pop_if_empty()
        .extend(["v1", collection, id]);
    Ok(url)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CallError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| CallError::Transport(err.to_string()))?;
    if !status.is_success() {
        return Err(CallError::Upstream(status_message(status, body.as_ref())));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|err| CallError::Upstream(format!("invalid payload: {err}")))
}

impl HttpIdentityClient {
    /// Build a client for `config` with a 10 second request timeout.
    ///
    /// # Errors
    /// Returns [`IdentityClientBuildError`] if the HTTP client cannot be built.
    pub fn new(config: IdentityClientConfig) -> Result<Self, IdentityClientBuildError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            secret_key: config.secret_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, CallError> {
        self.base_url
            .join(path)
            .map_err(|err| CallError::Transport(format!("invalid provider URL: {err}")))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, CallError> {
        request
            .bearer_auth(self.secret_key.as_str())
            .send()
            .await
            .map_err(|err| CallError::Transport(err.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Principal>, IdentityProviderError> {
        let url = self.url("v1/sessions/verify")?;
        let request = self.client.post(url).json(&VerifySessionRequest {
            token: token.expose(),
        });
        let response = self.send(request).await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND
        ) {
            debug!(status = %response.status(), "session rejected by provider");
            return Ok(None);
        }
        let session: VerifiedSession = decode(response).await?;
        let principal = Principal::user(session.user_id);
        Ok(Some(match session.org_id {
            Some(org_id) => principal.with_org(org_id),
            None => principal,
        }))
    }
}

#[async_trait]
impl EntitlementOracle for HttpIdentityClient {
    async fn has_capability(
        &self,
        principal: &Principal,
        capability: &Capability,
    ) -> Result<bool, EntitlementOracleError> {
        let (kind, name) = capability_parts(capability);
        let url = self.url("v1/authorization/check")?;
        let request = self.client.post(url).json(&AuthorizationCheck {
            user_id: principal.user_id.as_str(),
            org_id: principal.org_id.as_ref().map(|org| org.as_str()),
            kind,
            name,
        });
        let decision: AuthorizationDecision = decode(self.send(request).await?).await?;
        Ok(decision.allowed)
    }

    async fn plan_metadata(
        &self,
        subject: &MetadataSubject,
    ) -> Result<Option<String>, EntitlementOracleError> {
        let url = metadata_url(&self.base_url, subject)?;
        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: SubjectRecord = decode(response).await?;
        Ok(record.public_metadata.plan)
    }
}
