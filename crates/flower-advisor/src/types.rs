//! Core data types for flower recommendations and view state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One entry in a ranked recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowerRecommendation {
    /// 1-based display position, unique within a result set.
    pub rank: u32,
    /// Display name in Korean.
    pub name: String,
    /// English or scientific name used for image search. May be blank.
    #[serde(default)]
    pub english_name: String,
    pub planting_period: String,
    pub blooming_period: String,
    pub characteristics: String,
    pub caution: String,
    /// Popular varieties, most popular first.
    pub related_flowers: Vec<String>,
}

impl FlowerRecommendation {
    /// Name used to build the image query, falling back to the display name.
    pub fn search_name(&self) -> &str {
        let english = self.english_name.trim();
        if english.is_empty() {
            &self.name
        } else {
            english
        }
    }
}

/// The four mutually exclusive screens of the advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewState {
    #[default]
    Landing,
    Loading,
    Results,
    Error,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViewState::Landing => "LANDING",
            ViewState::Loading => "LOADING",
            ViewState::Results => "RESULTS",
            ViewState::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Faults raised by a generative backend.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid backend payload: {0}")]
    InvalidPayload(String),

    #[error("Missing backend credential")]
    MissingCredential,
}

/// Errors that can occur while fetching recommendations.
#[derive(thiserror::Error, Debug)]
pub enum RecommendationError {
    /// The backend answered without any text payload.
    #[error("Empty response from generative backend")]
    EmptyResponse,

    /// The payload was not JSON or did not match the recommendation shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Transport or backend fault.
    #[error("Request failed: {0}")]
    Request(#[from] BackendError),
}

impl RecommendationError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationError::EmptyResponse => "empty_response",
            RecommendationError::MalformedResponse(_) => "malformed_response",
            RecommendationError::Request(_) => "request",
        }
    }
}

impl From<serde_json::Error> for RecommendationError {
    fn from(e: serde_json::Error) -> Self {
        RecommendationError::MalformedResponse(e.to_string())
    }
}

/// Convenience result type.
pub type RecommendationResult<T> = Result<T, RecommendationError>;
