//! Assistant Gateway Adapters.
//!
//! Implementations of the AssistantGateway port.
//!
//! ## Available Adapters
//!
//! - `MockAssistantGateway` - Configurable mock for testing and offline runs
//! - `HttpAssistantGateway` - JSON-over-HTTP endpoint

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{HttpAssistantGateway, HttpGatewayConfig};
pub use mock_gateway::{MockAssistantGateway, MockReply};
