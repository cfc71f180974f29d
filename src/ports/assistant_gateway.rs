//! Assistant Gateway Port - Interface to the coach answering service.
//!
//! The session manager asks one question at a time and only cares whether an
//! answer came back. Every error variant is treated the same way upstream
//! (a fixed fallback turn), so the variants exist for logging only.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl AssistantGateway for Canned {
//!     async fn ask(&self, _query: &str) -> Result<String, GatewayError> {
//!         Ok("~600 kcal".to_string())
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "canned"
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Port for the external assistant.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Ask a single question and wait for the answer text.
    async fn ask(&self, query: &str) -> Result<String, GatewayError>;

    /// Gateway name for logging.
    fn name(&self) -> &'static str;
}

/// Assistant gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No answer within the configured bound.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Network or HTTP failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The gateway answered with something we could not use.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Gateway is not reachable or refused the request.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Transport(_) => "transport",
            GatewayError::MalformedResponse(_) => "malformed_response",
            GatewayError::Unavailable(_) => "unavailable",
        }
    }
}
