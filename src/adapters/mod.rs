//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `assistant` - Assistant gateways (HTTP, mock)

pub mod assistant;

pub use assistant::{HttpAssistantGateway, HttpGatewayConfig, MockAssistantGateway, MockReply};
