//! Configuration loading and resolution.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use flower_advisor::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use flower_advisor::{AdvisorSession, GeminiBackend, RecommendationClient};

/// Primary credential variable.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Legacy credential variable, read when the primary one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Default request deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolve the backend credential: explicit flag, then environment.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
    resolve_api_key_with(explicit, |name| std::env::var(name).ok())
}

fn resolve_api_key_with<F>(explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(|s| s.to_string())
        .or_else(|| lookup(API_KEY_ENV))
        .or_else(|| lookup(FALLBACK_API_KEY_ENV))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Everything needed to reach the generative backend.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AdvisorConfig {
    /// Build a config from CLI flags, filling gaps from the environment and defaults.
    pub fn resolve(
        api_key: Option<&str>,
        endpoint: Option<&str>,
        model: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_key: resolve_api_key(api_key),
            endpoint: endpoint.map(|s| s.to_string()).unwrap_or(defaults.endpoint),
            model: model.map(|s| s.to_string()).unwrap_or(defaults.model),
            timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Construct the recommendation client for this config.
    pub fn client(&self) -> anyhow::Result<RecommendationClient> {
        let api_key = self.api_key.as_deref().with_context(|| {
            format!("No API key. Pass --api-key or set {API_KEY_ENV}.")
        })?;
        let backend = GeminiBackend::with_config(api_key, &self.endpoint, &self.model, self.timeout)
            .context("Failed to initialize Gemini backend")?;
        tracing::info!("Backend: {} ({})", self.model, self.endpoint);
        Ok(RecommendationClient::new(Arc::new(backend)).with_timeout(self.timeout))
    }

    /// Construct a fresh session for this config.
    pub fn session(&self) -> anyhow::Result<AdvisorSession> {
        Ok(AdvisorSession::new(self.client()?))
    }
}

/// Path of the REPL history file.
pub fn resolve_history_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".flower_advisor_history")
}
