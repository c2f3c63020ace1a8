//! Caller resolution for HTTP handlers.
//!
//! [`Authenticated`] reads the `Authorization: Bearer` token, verifies it
//! with the identity provider, and binds the resulting principal to the
//! entitlement oracle. Handlers that take it never run for anonymous
//! callers.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::ports::{IdentityProviderError, SessionToken};
use crate::domain::{CallerContext, Error};

use super::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

/// Resolved caller for the current request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub CallerContext);

impl Authenticated {
    /// Unwrap into the caller context.
    pub fn into_inner(self) -> CallerContext {
        self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    SessionToken::new(token)
}

fn map_identity_error(error: IdentityProviderError) -> Error {
    debug!(%error, "session verification failed");
    Error::service_unavailable("identity provider unavailable")
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req.headers());
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let principal = match token {
                Some(token) => state
                    .identity
                    .verify_session(&token)
                    .await
                    .map_err(map_identity_error)?,
                None => None,
            };
            state.resolver.resolve(principal).map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    #[rstest]
    #[case("Bearer user_1", Some("user_1"))]
    #[case("Bearer   user_2  ", Some("user_2"))]
    #[case("bearer user_3", Some("user_3"))]
    #[case("BEARER user_4", Some("user_4"))]
    #[case("Bearer ", None)]
    #[case("Bearerx user_5", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("user_1", None)]
    fn extracts_bearer_tokens(#[case] header: &str, #[case] expected: Option<&str>) {
        let token = bearer_token(&headers(header));
        assert_eq!(token.as_ref().map(SessionToken::expose), expected);
    }

    #[test]
    fn missing_header_yields_no_token() {
        assert!(bearer_token(&HeaderMap::new()).is_none());
    }
}
