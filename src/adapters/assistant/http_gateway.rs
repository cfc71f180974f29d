//! HTTP Assistant Gateway - AssistantGateway over a JSON endpoint.
//!
//! Sends `POST {endpoint}` with `{"query": "..."}` and expects
//! `{"text": "..."}` back. An optional API key is sent as a bearer token.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpGatewayConfig::new("https://coach.example.com/ask")
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let gateway = HttpAssistantGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AssistantGateway, GatewayError};

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Full URL of the ask endpoint.
    pub endpoint: String,
    /// Bearer token, if the endpoint needs one.
    api_key: Option<Secret<String>>,
    /// Transport-level timeout.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the bearer token from an existing secret.
    pub fn with_secret(mut self, api_key: Option<Secret<String>>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    text: Option<String>,
}

/// AssistantGateway backed by an HTTP endpoint.
pub struct HttpAssistantGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpAssistantGateway {
    /// Creates a gateway with its own HTTP client.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn send(&self, query: &str) -> Result<Response, GatewayError> {
        let mut request = self
            .client
            .post(self.config.endpoint.as_str())
            .json(&AskRequest { query });
        if let Some(key) = self.config.api_key() {
            request = request.bearer_auth(key);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else if e.is_connect() {
                GatewayError::transport(format!("Connection failed: {}", e))
            } else {
                GatewayError::transport(e.to_string())
            }
        })
    }

    async fn parse(response: Response) -> Result<String, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to read body: {}", e)))?;
        parse_answer(&body)
    }
}

/// Maps a non-success status to a gateway error.
fn status_error(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => GatewayError::unavailable(body),
        _ => GatewayError::transport(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts the answer text from a response body.
fn parse_answer(body: &str) -> Result<String, GatewayError> {
    let parsed: AskResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::malformed(format!("Failed to parse response: {}", e)))?;

    match parsed.text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(GatewayError::malformed("empty answer text")),
        None => Err(GatewayError::malformed("missing 'text' field")),
    }
}

#[async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn ask(&self, query: &str) -> Result<String, GatewayError> {
        let response = self.send(query).await?;
        Self::parse(response).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = HttpGatewayConfig::new("http://localhost:9000/ask")
            .with_api_key("token")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.endpoint, "http://localhost:9000/ask");
        assert_eq!(config.api_key(), Some("token"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn config_debug_does_not_leak_key() {
        let config = HttpGatewayConfig::new("http://localhost").with_api_key("hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_string(&AskRequest { query: "Squat depth?" }).unwrap();
        assert_eq!(json, r#"{"query":"Squat depth?"}"#);
    }

    #[test]
    fn parse_answer_extracts_text() {
        assert_eq!(parse_answer(r#"{"text":"~600 kcal"}"#).unwrap(), "~600 kcal");
    }

    #[test]
    fn parse_answer_rejects_missing_or_blank_text() {
        assert!(matches!(
            parse_answer(r#"{"answer":"x"}"#),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_answer(r#"{"text":"  "}"#),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_answer("not json"),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn service_unavailable_maps_to_unavailable() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        assert!(matches!(err, GatewayError::Unavailable(ref m) if m == "maintenance"));
    }

    #[test]
    fn other_statuses_map_to_transport_with_status() {
        for status in [StatusCode::BAD_GATEWAY, StatusCode::UNAUTHORIZED, StatusCode::NOT_FOUND] {
            match status_error(status, "nope") {
                GatewayError::Transport(message) => {
                    assert!(message.contains(status.as_str()), "{}", message);
                    assert!(message.contains("nope"));
                }
                other => panic!("expected transport error for {}, got {:?}", status, other),
            }
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let gateway = HttpAssistantGateway::new(
            HttpGatewayConfig::new("http://127.0.0.1:9/ask").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let err = gateway.ask("hello").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Transport(_) | GatewayError::Timeout { .. }
        ));
    }
}
