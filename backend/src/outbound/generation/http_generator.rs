//! Reqwest-backed card generator.
//!
//! Owns transport details only: request serialisation, timeout and HTTP error
//! mapping, and extraction of the JSON object from the first choice. Schema
//! validation happens in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use zeroize::Zeroizing;

use super::dto::{ChatMessage, ChatRequest, ChatResponse, JsonSchemaFormat, ResponseFormat};
use crate::domain::ports::{CardGenerator, CardGeneratorError, GenerationRequest};
use crate::outbound::http_preview::status_message;

/// Connection settings for an OpenAI-compatible endpoint.
pub struct HttpGeneratorConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub endpoint: Url,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer API key.
    pub api_key: Zeroizing<String>,
    /// Client-side timeout; `None` waits for the server.
    pub timeout: Option<Duration>,
}

/// Card generator calling `POST {endpoint}/chat/completions`.
pub struct HttpCardGenerator {
    client: Client,
    completions_url: Url,
    model: String,
    api_key: Zeroizing<String>,
}

/// Errors raised while building the generator.
#[derive(Debug, thiserror::Error)]
pub enum HttpGeneratorBuildError {
    /// The endpoint cannot be extended with `chat/completions`.
    #[error("invalid generation endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("generation client: {0}")]
    Client(#[from] reqwest::Error),
}

fn completions_url(mut endpoint: Url) -> Result<Url, url::ParseError> {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint.join("chat/completions")
}

impl HttpCardGenerator {
    /// Build a generator from `config`.
    ///
    /// # Errors
    /// Returns [`HttpGeneratorBuildError`] when the endpoint is unusable or
    /// the client cannot be constructed.
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, HttpGeneratorBuildError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            completions_url: completions_url(config.endpoint)?,
            model: config.model,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl CardGenerator for HttpCardGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, CardGeneratorError> {
        let schema = request.schema.json_schema();
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema.name(),
                    strict: true,
                    schema: &schema,
                },
            },
        };
        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        parse_completion(bytes.as_ref())
    }
}

fn parse_completion(body: &[u8]) -> Result<Value, CardGeneratorError> {
    let decoded: ChatResponse = serde_json::from_slice(body)
        .map_err(|err| CardGeneratorError::decode(format!("invalid completion payload: {err}")))?;
    let message = decoded
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| CardGeneratorError::decode("completion has no choices"))?;
    if let Some(refusal) = message.refusal {
        return Err(CardGeneratorError::upstream(format!("model refused: {refusal}")));
    }
    let content = message
        .content
        .ok_or_else(|| CardGeneratorError::decode("completion has no content"))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|err| CardGeneratorError::decode(format!("content is not JSON: {err}")))?;
    if !value.is_object() {
        return Err(CardGeneratorError::decode("content is not a JSON object"));
    }
    Ok(value)
}

fn map_transport_error(error: reqwest::Error) -> CardGeneratorError {
    if error.is_timeout() {
        CardGeneratorError::timeout(error.to_string())
    } else {
        CardGeneratorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CardGeneratorError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CardGeneratorError::timeout(message)
        }
        _ => CardGeneratorError::upstream(message),
    }
}
