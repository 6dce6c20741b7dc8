//! Recommendation client: prompt construction, one backend call, validation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{GenerationRequest, GenerativeBackend};
use crate::prompt::{build_prompt, DEFAULT_TEMPERATURE};
use crate::query::{current_month, resolve_context};
use crate::types::{BackendError, FlowerRecommendation, RecommendationError, RecommendationResult};

/// Client-side deadline for a single recommendation call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds recommendation requests and validates the answers.
pub struct RecommendationClient {
    backend: Arc<dyn GenerativeBackend>,
    timeout: Duration,
    temperature: f32,
    fixed_month: Option<u32>,
}

impl RecommendationClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
            fixed_month: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Pin the calendar month instead of reading the local clock.
    pub fn with_fixed_month(mut self, month: u32) -> Self {
        self.fixed_month = Some(month);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn month(&self) -> u32 {
        self.fixed_month.unwrap_or_else(current_month)
    }

    /// Build the backend request for a query without sending it.
    pub fn build_request(&self, query: &str) -> GenerationRequest {
        let month = self.month();
        let context = resolve_context(query, month);
        GenerationRequest::json(build_prompt(&context, month), self.temperature)
    }

    /// Fetch recommendations for a query, sorted ascending by rank.
    ///
    /// Issues exactly one backend call. Never retries.
    pub async fn recommend(&self, query: &str) -> RecommendationResult<Vec<FlowerRecommendation>> {
        let request = self.build_request(query);
        tracing::info!(
            "Requesting recommendations for {:?} (model {})",
            query,
            self.backend.model()
        );
        tracing::debug!("Prompt:\n{}", request.prompt);

        let response = tokio::time::timeout(self.timeout, self.backend.generate(&request))
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))??;

        let text = response
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(RecommendationError::EmptyResponse)?;

        let flowers = parse_recommendations(&text)?;
        tracing::info!("Received {} recommendations", flowers.len());
        Ok(flowers)
    }
}

/// Parse and validate a JSON payload, returning entries sorted by rank.
pub fn parse_recommendations(text: &str) -> RecommendationResult<Vec<FlowerRecommendation>> {
    let mut flowers: Vec<FlowerRecommendation> = serde_json::from_str(text.trim())?;

    if flowers.is_empty() {
        return Err(RecommendationError::MalformedResponse(
            "expected at least one recommendation".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(flowers.len());
    for flower in &flowers {
        if flower.rank == 0 {
            return Err(RecommendationError::MalformedResponse(format!(
                "rank must be positive (got 0 for '{}')",
                flower.name
            )));
        }
        if !seen.insert(flower.rank) {
            return Err(RecommendationError::MalformedResponse(format!(
                "duplicate rank {}",
                flower.rank
            )));
        }
    }

    flowers.sort_by_key(|f| f.rank);
    Ok(flowers)
}
