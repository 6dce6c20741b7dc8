//! Flower Advisor — seasonal flower recommendations from a schema-constrained generative model.

pub mod backend;
pub mod client;
pub mod controller;
pub mod gemini;
pub mod imagery;
pub mod prompt;
pub mod query;
pub mod session;
pub mod types;

pub use backend::{GenerationRequest, GenerationResponse, GenerativeBackend};
pub use client::{parse_recommendations, RecommendationClient};
pub use controller::{Layout, Presentation, RequestTicket, ViewController, FAILURE_MESSAGE};
pub use gemini::GeminiBackend;
pub use imagery::{flower_image_url, landing_background_url};
pub use query::{normalize_query, resolve_context};
pub use session::AdvisorSession;
pub use types::*;
