//! `momentum` - talk to the coach from a terminal.
//!
//! Reads one question per line from stdin and prints the coach's replies.
//! Uses the configured HTTP endpoint, or the offline gateway when none is set.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use momentum_session::adapters::{HttpAssistantGateway, HttpGatewayConfig, MockAssistantGateway};
use momentum_session::application::{AssistantSessionManager, SessionShell, SubmitOutcome};
use momentum_session::config::AppConfig;
use momentum_session::domain::conversation::TurnRole;
use momentum_session::domain::entitlement::locked_features;
use momentum_session::ports::AssistantGateway;
use momentum_session::telemetry;

const OFFLINE_REPLY: &str = "The coach is offline. Set MOMENTUM__ASSISTANT__ENDPOINT to connect.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.telemetry)?;

    let gateway: Arc<dyn AssistantGateway> = match config.assistant.endpoint.as_deref() {
        Some(endpoint) if config.assistant.has_endpoint() => {
            let http = HttpGatewayConfig::new(endpoint)
                .with_secret(config.assistant.api_key.clone())
                .with_timeout(config.assistant.timeout());
            Arc::new(HttpAssistantGateway::new(http)?)
        }
        _ => Arc::new(MockAssistantGateway::new().with_default_reply(OFFLINE_REPLY)),
    };
    tracing::info!(gateway = gateway.name(), "assistant gateway ready");

    let assistant = AssistantSessionManager::new(gateway)
        .with_timeout(config.assistant.timeout())
        .with_fallback_message(config.assistant.fallback_message.clone());
    let funnel = config.funnel.clone();
    let mut shell = SessionShell::with_exit_intent(assistant, Arc::new(move || funnel.subscription()));

    shell.login()?;
    tracing::debug!(locked = ?locked_features(shell.tier()), "session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match shell.ask_coach(&line)? {
            SubmitOutcome::Accepted(pending) => {
                pending.settled().await;
                let snapshot = shell.conversation();
                if let Some(turn) = snapshot
                    .history
                    .iter()
                    .rev()
                    .find(|turn| turn.role() == TurnRole::Assistant)
                {
                    println!("coach> {}", turn.text());
                }
            }
            SubmitOutcome::Rejected(_) => continue,
        }
    }

    shell.logout()?;
    Ok(())
}
