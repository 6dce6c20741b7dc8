//! View controller for the landing, loading, results and error screens.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::query::normalize_query;
use crate::types::{FlowerRecommendation, RecommendationError, RecommendationResult, ViewState};

/// The one message shown for every failure kind.
pub const FAILURE_MESSAGE: &str =
    "죄송합니다. 꽃 정보를 불러오는데 실패했습니다. 잠시 후 다시 시도해주세요.";

const DEFAULT_LIST_TITLE: &str = "이달의 추천 꽃 TOP 10";
const SINGLE_DESCRIPTION: &str = "검색하신 꽃에 대한 재배 정보와 인기 품종입니다.";
const LIST_DESCRIPTION: &str =
    "선택하신 시기와 환경에 가장 적합한 식물들을 엄선했습니다. \n카드를 눌러 상세 정보를 확인해보세요.";

/// A request the caller must run and report back through [`ViewController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub token: u64,
    pub query: String,
}

/// How the result list should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Exactly one entry, shown as a detail view.
    Single,
    /// A ranked list.
    Ranked,
}

/// Read-only projection of the results header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub title: String,
    pub description: String,
    pub layout: Layout,
}

/// Owns the view state and applies transitions.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    state: ViewState,
    query: String,
    flowers: Vec<FlowerRecommendation>,
    error: Option<String>,
    last_failure: Option<String>,
    latest_token: u64,
    expanded: BTreeSet<u32>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// The normalized query of the latest start.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results in display order.
    pub fn flowers(&self) -> &[FlowerRecommendation] {
        &self.flowers
    }

    /// User-facing error message, set only in `ERROR`.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Description of the last failure, kept for logs and tests.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Token of the most recently issued ticket.
    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// Begin a new search. Valid from every state.
    pub fn start(&mut self, raw: &str) -> RequestTicket {
        let query = normalize_query(raw);
        self.latest_token += 1;
        self.state = ViewState::Loading;
        self.error = None;
        self.last_failure = None;
        self.expanded.clear();
        self.query = query.clone();
        tracing::debug!("start #{} query={:?}", self.latest_token, query);
        RequestTicket {
            token: self.latest_token,
            query,
        }
    }

    /// Re-issue the stored query. Only from `RESULTS` or `ERROR`.
    pub fn retry(&mut self) -> Option<RequestTicket> {
        match self.state {
            ViewState::Results | ViewState::Error => {
                let query = self.query.clone();
                Some(self.start(&query))
            }
            ViewState::Landing | ViewState::Loading => None,
        }
    }

    /// Return to the landing screen, dropping query and results.
    ///
    /// Any outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        self.latest_token += 1;
        self.state = ViewState::Landing;
        self.query.clear();
        self.flowers.clear();
        self.error = None;
        self.last_failure = None;
        self.expanded.clear();
    }

    /// Apply the outcome of a ticket. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        token: u64,
        outcome: RecommendationResult<Vec<FlowerRecommendation>>,
    ) -> bool {
        if token != self.latest_token || self.state != ViewState::Loading {
            tracing::warn!(
                "Discarding stale response #{token} (latest #{}, state {})",
                self.latest_token,
                self.state
            );
            return false;
        }

        match outcome {
            Ok(mut flowers) => {
                flowers.sort_by_key(|f| f.rank);
                self.flowers = flowers;
                self.state = ViewState::Results;
            }
            Err(e) => {
                self.fail(&e);
            }
        }
        true
    }

    fn fail(&mut self, e: &RecommendationError) {
        tracing::warn!("Recommendation failed ({}): {e}", e.kind());
        self.flowers.clear();
        self.expanded.clear();
        self.error = Some(FAILURE_MESSAGE.to_string());
        self.last_failure = Some(e.to_string());
        self.state = ViewState::Error;
    }

    /// Whether the results form a single detail entry.
    pub fn is_single(&self) -> bool {
        self.flowers.len() == 1
    }

    /// Title, description and layout derived from the current results.
    pub fn presentation(&self) -> Presentation {
        if let [only] = self.flowers.as_slice() {
            return Presentation {
                title: format!("{} 상세 정보", only.name),
                description: SINGLE_DESCRIPTION.to_string(),
                layout: Layout::Single,
            };
        }

        let title = if self.query.is_empty() {
            DEFAULT_LIST_TITLE.to_string()
        } else {
            format!("{} 추천 꽃 TOP 10", self.query)
        };
        Presentation {
            title,
            description: LIST_DESCRIPTION.to_string(),
            layout: Layout::Ranked,
        }
    }

    /// Message shown while a request is in flight.
    pub fn loading_message(&self) -> String {
        if self.query.is_empty() {
            "이번 달 추천 꽃을 찾고 있습니다...".to_string()
        } else {
            format!("\"{}\"에 대한 정보를 찾고 있습니다...", self.query)
        }
    }

    /// Toggle the detail section of a result card.
    ///
    /// Returns the new expanded flag, or `None` if no card has that rank.
    pub fn toggle_details(&mut self, rank: u32) -> Option<bool> {
        if self.state != ViewState::Results || !self.flowers.iter().any(|f| f.rank == rank) {
            return None;
        }
        if self.expanded.remove(&rank) {
            Some(false)
        } else {
            self.expanded.insert(rank);
            Some(true)
        }
    }

    pub fn is_expanded(&self, rank: u32) -> bool {
        self.expanded.contains(&rank)
    }
}
