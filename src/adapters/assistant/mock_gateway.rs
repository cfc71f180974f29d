//! Mock Assistant Gateway for testing and offline runs.
//!
//! Provides a configurable mock implementation of the AssistantGateway port,
//! allowing tests to run without calling a real assistant.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Simulated latency, or a call that never resolves
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockAssistantGateway::new()
//!     .with_reply("~600 kcal")
//!     .with_delay(Duration::from_millis(100));
//!
//! assert_eq!(gateway.ask("How many calories today?").await?, "~600 kcal");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AssistantGateway, GatewayError};

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this text.
    Answer(String),
    /// Fail with this error.
    Error(GatewayError),
    /// Never resolve.
    Hang,
}

/// Mock assistant gateway.
#[derive(Debug, Clone)]
pub struct MockAssistantGateway {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Reply used once the queue is empty.
    default_reply: String,
    /// Simulated latency per request.
    delay: Duration,
    /// Queries received, in call order.
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockAssistantGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAssistantGateway {
    /// Creates a new mock gateway with no queued replies and no latency.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_reply: "Mock response".to_string(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(MockReply::Answer(text.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GatewayError) -> Self {
        lock(&self.replies).push_back(MockReply::Error(error));
        self
    }

    /// Queues a call that never resolves.
    pub fn with_hang(self) -> Self {
        lock(&self.replies).push_back(MockReply::Hang);
        self
    }

    /// Sets the reply used once the queue is empty.
    pub fn with_default_reply(mut self, text: impl Into<String>) -> Self {
        self.default_reply = text.into();
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this gateway.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded queries.
    pub fn get_calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self) -> MockReply {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Answer(self.default_reply.clone()))
    }
}

#[async_trait]
impl AssistantGateway for MockAssistantGateway {
    async fn ask(&self, query: &str) -> Result<String, GatewayError> {
        lock(&self.calls).push(query.to_string());
        let reply = self.next_reply();

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match reply {
            MockReply::Answer(text) => Ok(text),
            MockReply::Error(err) => Err(err),
            MockReply::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
