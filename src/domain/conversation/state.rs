//! Conversation state with a single pending-request slot.
//!
//! # Invariants
//!
//! - `history` is append-only; insertion order is display order
//! - At most one request is pending at a time
//! - Resolving the pending request appends exactly one assistant turn
//! - A resolution whose token does not own the pending slot changes nothing
//! - Generations never repeat, even across `reset`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ConversationTurn;
use crate::domain::foundation::RequestToken;

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("query is empty")]
    EmptyQuery,

    #[error("request {pending} is still pending")]
    RequestPending { pending: RequestToken },
}

/// Text to append when the pending request resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    /// The gateway answered.
    Answer(String),
    /// The gateway failed; the fixed fallback text is shown instead.
    Fallback(String),
}

/// Outcome of resolving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Answered,
    FellBack,
    /// The token no longer owned the pending slot; nothing was appended.
    Discarded,
}

/// Read-only view of the conversation for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub history: Vec<ConversationTurn>,
    pub pending: bool,
}

/// Conversation history plus the in-flight request slot.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    history: Vec<ConversationTurn>,
    pending: Option<RequestToken>,
    generation: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending
    }

    /// Starts a request for `query`.
    ///
    /// On success the user turn is appended and the returned token owns
    /// the pending slot.
    pub fn begin(&mut self, query: &str) -> Result<RequestToken, SubmitRejection> {
        if query.trim().is_empty() {
            return Err(SubmitRejection::EmptyQuery);
        }
        if let Some(pending) = self.pending {
            return Err(SubmitRejection::RequestPending { pending });
        }

        self.generation += 1;
        let token = RequestToken::new(self.generation);
        self.history.push(ConversationTurn::user(query));
        self.pending = Some(token);
        Ok(token)
    }

    /// Resolves the request identified by `token`.
    pub fn resolve(&mut self, token: RequestToken, reply: AssistantReply) -> Resolution {
        if self.pending != Some(token) {
            return Resolution::Discarded;
        }

        self.pending = None;
        match reply {
            AssistantReply::Answer(text) => {
                self.history.push(ConversationTurn::assistant(text));
                Resolution::Answered
            }
            AssistantReply::Fallback(text) => {
                self.history.push(ConversationTurn::assistant(text));
                Resolution::FellBack
            }
        }
    }

    /// Clears history and the pending slot.
    ///
    /// The generation counter is kept so a response to the cleared request
    /// is recognised as stale.
    pub fn reset(&mut self) {
        self.history.clear();
        self.pending = None;
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            history: self.history.clone(),
            pending: self.is_pending(),
        }
    }
}
