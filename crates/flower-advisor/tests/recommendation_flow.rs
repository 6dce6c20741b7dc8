//! End-to-end tests for the recommendation client and advisor session,
//! driven by a scripted in-process backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use flower_advisor::*;

// ─────────────────────── helpers ───────────────────────

#[derive(Clone)]
enum Reply {
    Text(String),
    Empty,
    Fail(u16),
    Slow(Duration, String),
}

/// Backend that answers from a script and records every request.
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, BackendError> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Empty);
        match reply {
            Reply::Text(text) => Ok(GenerationResponse::text(text)),
            Reply::Empty => Ok(GenerationResponse::empty()),
            Reply::Fail(status) => Err(BackendError::Status {
                status,
                body: "quota exceeded".to_string(),
            }),
            Reply::Slow(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(GenerationResponse::text(text))
            }
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn entry(rank: u32, name: &str) -> Value {
    json!({
        "rank": rank,
        "name": name,
        "englishName": format!("{name} flower"),
        "plantingPeriod": "4월 중순",
        "bloomingPeriod": "5월~7월",
        "characteristics": "키우기 쉬움",
        "caution": "과습 주의",
        "relatedFlowers": ["v1", "v2", "v3", "v4", "v5"]
    })
}

fn list(names: &[(u32, &str)]) -> String {
    Value::Array(names.iter().map(|(r, n)| entry(*r, n)).collect()).to_string()
}

fn client(backend: Arc<ScriptedBackend>) -> RecommendationClient {
    RecommendationClient::new(backend).with_fixed_month(11)
}

// ═══════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_01_results_sorted_by_rank() {
    let backend = ScriptedBackend::new(vec![Reply::Text(list(&[
        (3, "팬지"),
        (1, "제라늄"),
        (10, "국화"),
        (2, "페튜니아"),
    ]))]);
    let flowers = client(backend.clone()).recommend("봄꽃").await.unwrap();
    let ranks: Vec<u32> = flowers.iter().map(|f| f.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 10]);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_02_request_is_schema_constrained_and_low_temperature() {
    let backend = ScriptedBackend::new(vec![Reply::Text(list(&[(1, "수국")]))]);
    client(backend.clone()).recommend("수국").await.unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.response_mime_type, "application/json");
    assert_eq!(request.response_schema["type"], "ARRAY");
    assert!(request.temperature <= 0.5);
    assert!(request.prompt.contains("\"수국\""));
}

#[tokio::test]
async fn test_03_empty_query_resolves_to_month_default() {
    let backend = ScriptedBackend::new(vec![Reply::Text(list(&[(1, "a")]))]);
    client(backend.clone()).recommend("").await.unwrap();

    let prompt = &backend.requests()[0].prompt;
    assert!(prompt.contains("11월에 한국에서 심기 가장 좋은 인기 묘종 TOP 10"));
}

#[tokio::test]
async fn test_04_empty_payload_is_empty_response() {
    let backend = ScriptedBackend::new(vec![Reply::Empty]);
    let err = client(backend).recommend("수국").await.unwrap_err();
    assert!(matches!(err, RecommendationError::EmptyResponse));

    let backend = ScriptedBackend::new(vec![Reply::Text("   ".to_string())]);
    let err = client(backend).recommend("수국").await.unwrap_err();
    assert!(matches!(err, RecommendationError::EmptyResponse));
}

#[tokio::test]
async fn test_05_malformed_payload() {
    let backend = ScriptedBackend::new(vec![Reply::Text("```json [oops".to_string())]);
    let err = client(backend).recommend("수국").await.unwrap_err();
    assert!(matches!(err, RecommendationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_06_backend_fault_is_request_error_without_retry() {
    let backend = ScriptedBackend::new(vec![Reply::Fail(429), Reply::Text(list(&[(1, "a")]))]);
    let err = client(backend.clone()).recommend("수국").await.unwrap_err();
    match err {
        RecommendationError::Request(BackendError::Status { status, .. }) => assert_eq!(status, 429),
        other => panic!("expected request error, got {other:?}"),
    }
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_07_client_timeout() {
    let backend = ScriptedBackend::new(vec![Reply::Slow(Duration::from_secs(10), list(&[(1, "a")]))]);
    let err = client(backend)
        .with_timeout(Duration::from_millis(50))
        .recommend("수국")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RecommendationError::Request(BackendError::Timeout(_))
    ));
}

// ═══════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_10_month_number_reaches_results() {
    let backend = ScriptedBackend::new(vec![Reply::Text(list(&[(2, "b"), (1, "a")]))]);
    let mut session = AdvisorSession::new(client(backend.clone()));

    let state = session.submit("7").await;
    assert_eq!(state, ViewState::Results);

    let view = session.snapshot().await;
    assert_eq!(view.query(), "7월");
    assert!(view.presentation().title.contains("7월"));
    assert!(backend.requests()[0].prompt.contains("\"7월\""));
}

#[tokio::test]
async fn test_11_empty_and_malformed_reach_error() {
    let backend = ScriptedBackend::new(vec![Reply::Empty, Reply::Text("{not json".to_string())]);
    let mut session = AdvisorSession::new(client(backend));

    assert_eq!(session.submit("수국").await, ViewState::Error);
    let view = session.snapshot().await;
    assert_eq!(view.error_message(), Some(FAILURE_MESSAGE));
    assert_eq!(view.query(), "수국");

    session.retry().await.unwrap();
    assert_eq!(session.wait().await, ViewState::Error);
    let view = session.snapshot().await;
    assert!(view.last_failure().unwrap().contains("Malformed"));
}

#[tokio::test]
async fn test_12_single_result_detail_view() {
    let backend = ScriptedBackend::new(vec![Reply::Text(list(&[(1, "라벤더")]))]);
    let mut session = AdvisorSession::new(client(backend));
    session.submit("라벤더").await;

    let p = session.snapshot().await.presentation();
    assert_eq!(p.title, "라벤더 상세 정보");
    assert_eq!(p.layout, Layout::Single);
}

#[tokio::test]
async fn test_13_repeated_retry_issues_identical_requests() {
    let reply = Reply::Text(list(&[(1, "a"), (2, "b")]));
    let backend = ScriptedBackend::new(vec![reply.clone(), reply.clone(), reply]);
    let mut session = AdvisorSession::new(client(backend.clone()));

    session.submit("베란다 정원").await;
    for _ in 0..2 {
        session.retry().await.unwrap();
        assert_eq!(session.wait().await, ViewState::Results);
    }

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1], requests[2]);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn test_14_newer_start_supersedes_slow_request() {
    let backend = ScriptedBackend::new(vec![
        Reply::Slow(Duration::from_secs(5), list(&[(1, "old")])),
        Reply::Text(list(&[(1, "new")])),
    ]);
    let mut session = AdvisorSession::new(client(backend));

    let first = session.start("수국").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = session.start("튤립").await;
    assert!(second.token > first.token);

    assert_eq!(session.wait().await, ViewState::Results);
    let view = session.snapshot().await;
    assert_eq!(view.flowers()[0].name, "new");
    assert_eq!(view.query(), "튤립");
}

#[tokio::test]
async fn test_15_reset_cancels_in_flight() {
    let backend = ScriptedBackend::new(vec![Reply::Slow(Duration::from_secs(5), list(&[(1, "a")]))]);
    let mut session = AdvisorSession::new(client(backend));

    session.start("수국").await;
    assert!(session.is_busy());
    session.reset().await;
    assert!(!session.is_busy());

    let view = session.snapshot().await;
    assert_eq!(view.state(), ViewState::Landing);
    assert!(view.query().is_empty());
}
