//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AssistantGateway` - The coach answering service

mod assistant_gateway;

pub use assistant_gateway::{AssistantGateway, GatewayError};
