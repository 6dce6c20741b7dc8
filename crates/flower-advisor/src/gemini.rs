//! Gemini `generateContent` backend over the Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{GenerationRequest, GenerationResponse, GenerativeBackend};
use crate::types::BackendError;

/// Default REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` when it carries no text.
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini REST backend.
#[derive(Clone)]
pub struct GeminiBackend {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend with the default endpoint, model and timeout.
    pub fn new(api_key: &str) -> Result<Self, BackendError> {
        Self::with_config(
            api_key,
            DEFAULT_ENDPOINT,
            DEFAULT_MODEL,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    /// Create a backend against an explicit endpoint and model.
    pub fn with_config(
        api_key: &str,
        endpoint: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(BackendError::MissingCredential);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flower-advisor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Full `generateContent` URL for the configured model.
    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, BackendError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: &request.response_mime_type,
                response_schema: &request.response_schema,
                temperature: request.temperature,
            },
        };

        tracing::debug!("POST {} (model {})", self.url(), self.model);

        let resp = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| BackendError::InvalidPayload(e.to_string()))?;

        Ok(GenerationResponse {
            text: parsed.into_text(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
