//! Application layer - Orchestrates domain operations over the ports.
//!
//! - `AssistantSessionManager` - Single-flight coach conversation
//! - `SessionShell` - Named operations across login, coach and funnel

mod assistant_session;
mod session_shell;

pub use assistant_session::{
    AssistantSessionManager, PendingRequest, SubmitOutcome, DEFAULT_ASSISTANT_TIMEOUT,
    DEFAULT_FALLBACK_MESSAGE,
};
pub use session_shell::{ExitIntentFactory, SessionShell};
