//! Async session owning the single in-flight recommendation request.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::RecommendationClient;
use crate::controller::{RequestTicket, ViewController};
use crate::types::ViewState;

/// Drives a [`ViewController`] with a [`RecommendationClient`].
///
/// Starting a new request aborts the previous one, and every outcome is
/// applied through its ticket token, so a late answer never overwrites a
/// newer state.
pub struct AdvisorSession {
    client: Arc<RecommendationClient>,
    controller: Arc<Mutex<ViewController>>,
    in_flight: Option<JoinHandle<()>>,
}

impl AdvisorSession {
    pub fn new(client: RecommendationClient) -> Self {
        Self {
            client: Arc::new(client),
            controller: Arc::new(Mutex::new(ViewController::new())),
            in_flight: None,
        }
    }

    /// Shared handle to the controller.
    pub fn controller(&self) -> Arc<Mutex<ViewController>> {
        self.controller.clone()
    }

    /// Whether a request task is still running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start a search for raw user input.
    pub async fn start(&mut self, raw: &str) -> RequestTicket {
        let ticket = self.controller.lock().await.start(raw);
        self.spawn(ticket.clone());
        ticket
    }

    /// Re-issue the stored query from `RESULTS` or `ERROR`.
    pub async fn retry(&mut self) -> Option<RequestTicket> {
        let ticket = self.controller.lock().await.retry()?;
        self.spawn(ticket.clone());
        Some(ticket)
    }

    /// Cancel any request and return to the landing state.
    pub async fn reset(&mut self) {
        self.cancel_in_flight();
        self.controller.lock().await.reset();
    }

    /// Wait for the in-flight request, if any, and return the resulting state.
    ///
    /// Dropping this future leaves the request running; it can still be
    /// cancelled by a later `start` or `reset`.
    pub async fn wait(&mut self) -> ViewState {
        if let Some(handle) = self.in_flight.as_mut() {
            let joined = handle.await;
            self.in_flight = None;
            if let Err(e) = joined {
                if !e.is_cancelled() {
                    tracing::error!("Recommendation task failed: {e}");
                }
            }
        }
        self.controller.lock().await.state()
    }

    /// Start a search and wait for it to settle.
    pub async fn submit(&mut self, raw: &str) -> ViewState {
        self.start(raw).await;
        self.wait().await
    }

    /// Copy of the current controller state.
    pub async fn snapshot(&self) -> ViewController {
        self.controller.lock().await.clone()
    }

    fn spawn(&mut self, ticket: RequestTicket) {
        self.cancel_in_flight();

        let client = self.client.clone();
        let controller = self.controller.clone();
        tracing::info!("Issuing request #{} for {:?}", ticket.token, ticket.query);

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = client.recommend(&ticket.query).await;
            let applied = controller.lock().await.complete(ticket.token, outcome);
            if applied {
                tracing::info!("Request #{} applied", ticket.token);
            }
        }));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::info!("Cancelling superseded request");
                handle.abort();
            }
        }
    }
}

impl Drop for AdvisorSession {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
