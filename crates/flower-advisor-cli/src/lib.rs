//! Terminal front end for Flower Advisor: one-shot recommendations and an interactive REPL.

pub mod config;
pub mod render;
pub mod repl;

pub use config::{resolve_api_key, AdvisorConfig};
