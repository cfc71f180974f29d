//! AssistantSessionManager - Single-flight conversation with the coach.
//!
//! Owns the conversation state and the assistant gateway. A submission
//! appends the user turn synchronously and hands the gateway call to a
//! spawned task; the task resolves the request with either the answer or
//! the fallback message.
//!
//! The state lock is only held for synchronous sections, never across an
//! `.await`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::domain::conversation::{
    AssistantReply, ConversationSnapshot, ConversationState, Resolution, SubmitRejection,
};
use crate::domain::foundation::RequestToken;
use crate::ports::{AssistantGateway, GatewayError};

/// Text shown in place of an answer when the gateway fails.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Connection error.";

/// Upper bound on a single gateway call.
pub const DEFAULT_ASSISTANT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Result of a submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The query was appended and a gateway call is in flight.
    Accepted(PendingRequest),
    /// The query was ignored. Nothing changed.
    Rejected(SubmitRejection),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    /// Returns the pending request, if accepted.
    pub fn accepted(self) -> Option<PendingRequest> {
        match self {
            SubmitOutcome::Accepted(pending) => Some(pending),
            SubmitOutcome::Rejected(_) => None,
        }
    }
}

/// Handle to an in-flight gateway call.
#[derive(Debug)]
pub struct PendingRequest {
    token: RequestToken,
    handle: JoinHandle<Resolution>,
}

impl PendingRequest {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Waits until the request has been resolved or discarded.
    pub async fn settled(self) -> Resolution {
        match self.handle.await {
            Ok(resolution) => resolution,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(token = %self.token, "assistant task cancelled");
                Resolution::Discarded
            }
            Err(e) => {
                tracing::warn!(token = %self.token, error = %e, "assistant task did not finish");
                Resolution::Discarded
            }
        }
    }
}

/// Manages the coach conversation for one session.
pub struct AssistantSessionManager {
    gateway: Arc<dyn AssistantGateway>,
    state: Arc<Mutex<ConversationState>>,
    updates: Arc<watch::Sender<ConversationSnapshot>>,
    in_flight: Mutex<Option<AbortHandle>>,
    timeout: Duration,
    fallback_message: String,
}

fn lock(state: &Mutex<ConversationState>) -> MutexGuard<'_, ConversationState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AssistantSessionManager {
    pub fn new(gateway: Arc<dyn AssistantGateway>) -> Self {
        let (updates, _) = watch::channel(ConversationSnapshot::default());
        Self {
            gateway,
            state: Arc::new(Mutex::new(ConversationState::new())),
            updates: Arc::new(updates),
            in_flight: Mutex::new(None),
            timeout: DEFAULT_ASSISTANT_TIMEOUT,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Sets the bound on each gateway call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the text appended when the gateway fails.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Submits a query to the coach.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, query: &str) -> SubmitOutcome {
        let token = {
            let mut state = lock(&self.state);
            match state.begin(query) {
                Ok(token) => {
                    self.updates.send_replace(state.snapshot());
                    token
                }
                Err(rejection) => {
                    tracing::debug!(%rejection, "query ignored");
                    return SubmitOutcome::Rejected(rejection);
                }
            }
        };
        tracing::debug!(%token, gateway = self.gateway.name(), "query accepted");

        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let updates = Arc::clone(&self.updates);
        let timeout = self.timeout;
        let fallback = self.fallback_message.clone();
        let query = query.to_string();

        let handle = tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, gateway.ask(&query))
                .await
                .unwrap_or_else(|_| {
                    Err(GatewayError::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    })
                });

            let reply = match outcome {
                Ok(text) => AssistantReply::Answer(text),
                Err(err) => {
                    tracing::warn!(%token, kind = err.kind(), error = %err, "assistant request failed");
                    AssistantReply::Fallback(fallback)
                }
            };

            let mut state = lock(&state);
            let resolution = state.resolve(token, reply);
            match resolution {
                Resolution::Discarded => {
                    tracing::debug!(%token, "stale response discarded");
                }
                _ => {
                    updates.send_replace(state.snapshot());
                }
            }
            resolution
        });

        *self.in_flight_slot() = Some(handle.abort_handle());
        SubmitOutcome::Accepted(PendingRequest { token, handle })
    }

    /// Clears the conversation and cancels the gateway call in flight, if any.
    ///
    /// A response that lands before the cancellation takes effect is dropped
    /// by the token check.
    pub fn reset(&self) {
        {
            let mut state = lock(&self.state);
            state.reset();
            self.updates.send_replace(state.snapshot());
        }
        if let Some(task) = self.in_flight_slot().take() {
            task.abort();
            tracing::debug!("in-flight assistant call cancelled");
        }
        tracing::debug!("conversation reset");
    }

    fn in_flight_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        lock(&self.state).snapshot()
    }

    /// Receiver that observes a new snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.updates.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAssistantGateway;
    use crate::domain::conversation::TurnRole;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manager(gateway: MockAssistantGateway) -> AssistantSessionManager {
        AssistantSessionManager::new(Arc::new(gateway))
    }

    #[tokio::test]
    async fn answer_is_appended_after_user_turn() {
        let gateway = MockAssistantGateway::new().with_reply("~600 kcal");
        let manager = manager(gateway.clone());

        let pending = manager.submit("How many calories today?").accepted().unwrap();
        assert!(manager.snapshot().pending);
        assert_eq!(pending.settled().await, Resolution::Answered);

        let snapshot = manager.snapshot();
        assert!(!snapshot.pending);
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0].role(), TurnRole::User);
        assert_eq!(snapshot.history[0].text(), "How many calories today?");
        assert_eq!(snapshot.history[1].role(), TurnRole::Assistant);
        assert_eq!(snapshot.history[1].text(), "~600 kcal");
        assert_eq!(gateway.get_calls(), vec!["How many calories today?"]);
    }

    #[tokio::test]
    async fn blank_queries_change_nothing() {
        let gateway = MockAssistantGateway::new();
        let manager = manager(gateway.clone());

        for query in ["", "   ", "\n\t"] {
            assert!(matches!(
                manager.submit(query),
                SubmitOutcome::Rejected(SubmitRejection::EmptyQuery)
            ));
        }

        assert_eq!(manager.snapshot(), ConversationSnapshot::default());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_rejected() {
        let gateway = MockAssistantGateway::new()
            .with_reply("answer a")
            .with_delay(Duration::from_millis(20));
        let manager = manager(gateway.clone());

        let first = manager.submit("a").accepted().unwrap();
        let second = manager.submit("b");
        assert!(matches!(
            second,
            SubmitOutcome::Rejected(SubmitRejection::RequestPending { pending }) if pending == first.token()
        ));

        first.settled().await;
        let snapshot = manager.snapshot();
        let texts: Vec<_> = snapshot.history.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["a", "answer a"]);
        assert!(!snapshot.pending);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_appends_fallback_once() {
        let gateway = MockAssistantGateway::new()
            .with_error(GatewayError::transport("connection reset"))
            .with_reply("second answer");
        let manager = manager(gateway);

        let pending = manager.submit("a").accepted().unwrap();
        assert_eq!(pending.settled().await, Resolution::FellBack);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[1].text(), DEFAULT_FALLBACK_MESSAGE);
        assert!(!snapshot.pending);

        let retry = manager.submit("b").accepted().unwrap();
        assert_eq!(retry.settled().await, Resolution::Answered);
        assert_eq!(manager.snapshot().history.len(), 4);
    }

    #[tokio::test]
    async fn fallback_message_is_configurable() {
        let gateway = MockAssistantGateway::new().with_error(GatewayError::malformed("no text"));
        let manager = manager(gateway).with_fallback_message("Coach is offline.");

        manager.submit("a").accepted().unwrap().settled().await;
        assert_eq!(manager.snapshot().history[1].text(), "Coach is offline.");
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_gateway_times_out_to_fallback() {
        let gateway = MockAssistantGateway::new().with_hang();
        let manager = manager(gateway).with_timeout(Duration::from_secs(15));

        let pending = manager.submit("a").accepted().unwrap();
        assert_eq!(pending.settled().await, Resolution::FellBack);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.history[1].text(), DEFAULT_FALLBACK_MESSAGE);
        assert!(!snapshot.pending);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_flight_discards_late_response() {
        let gateway = MockAssistantGateway::new()
            .with_reply("late")
            .with_delay(Duration::from_secs(1));
        let manager = manager(gateway);

        let pending = manager.submit("a").accepted().unwrap();
        manager.reset();
        assert_eq!(manager.snapshot(), ConversationSnapshot::default());

        assert_eq!(pending.settled().await, Resolution::Discarded);
        assert_eq!(manager.snapshot(), ConversationSnapshot::default());

        let next = manager.submit("b").accepted().unwrap();
        assert_eq!(next.settled().await, Resolution::Answered);
        assert_eq!(manager.snapshot().history.len(), 2);
    }

    /// Counts concurrent gateway calls; each call takes five seconds.
    struct CountingGateway {
        active: Arc<AtomicUsize>,
        peak: AtomicUsize,
    }

    struct ActiveGuard(Arc<AtomicUsize>);

    impl Drop for ActiveGuard {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl AssistantGateway for CountingGateway {
        async fn ask(&self, query: &str) -> Result<String, GatewayError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let _guard = ActiveGuard(Arc::clone(&self.active));
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(format!("re: {}", query))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_the_call_in_flight() {
        let gateway = Arc::new(CountingGateway {
            active: Arc::new(AtomicUsize::new(0)),
            peak: AtomicUsize::new(0),
        });
        let manager = AssistantSessionManager::new(gateway.clone());

        let first = manager.submit("a").accepted().unwrap();
        tokio::task::yield_now().await;
        assert_eq!(gateway.active.load(Ordering::SeqCst), 1);

        manager.reset();
        let start = tokio::time::Instant::now();
        assert_eq!(first.settled().await, Resolution::Discarded);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(gateway.active.load(Ordering::SeqCst), 0);

        let second = manager.submit("b").accepted().unwrap();
        assert_eq!(second.settled().await, Resolution::Answered);
        assert_eq!(gateway.peak.load(Ordering::SeqCst), 1);

        let texts: Vec<_> = manager
            .snapshot()
            .history
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(texts, vec!["b", "re: b"]);
    }

    #[tokio::test]
    async fn subscribers_see_each_mutation() {
        let gateway = MockAssistantGateway::new().with_reply("hi");
        let manager = manager(gateway);
        let mut updates = manager.subscribe();

        let pending = manager.submit("hello").accepted().unwrap();
        updates.changed().await.unwrap();
        {
            let snapshot = updates.borrow_and_update();
            assert!(!snapshot.history.is_empty());
        }

        pending.settled().await;
        let latest = updates.borrow().clone();
        assert_eq!(latest.history.len(), 2);
        assert!(!latest.pending);
    }
}
