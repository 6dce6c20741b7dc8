//! The seam between the recommendation client and a generative model.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::prompt::{response_schema, RESPONSE_MIME_TYPE};
use crate::types::BackendError;

/// A single schema-constrained generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: Value,
    pub response_mime_type: String,
    pub temperature: f32,
}

impl GenerationRequest {
    /// Request JSON output constrained to the recommendation schema.
    pub fn json(prompt: String, temperature: f32) -> Self {
        Self {
            prompt,
            response_schema: response_schema(),
            response_mime_type: RESPONSE_MIME_TYPE.to_string(),
            temperature,
        }
    }
}

/// Raw backend answer. `text` is `None` when the model produced no payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: Option<String>,
}

impl GenerationResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}

/// A generative text/JSON backend.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Issue exactly one generation request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, BackendError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
