//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `entitlement` - Subscription tiers and the fail-closed feature resolver
//! - `conversation` - Coach conversation history and single-flight slot
//! - `funnel` - Conversion funnel and exit-intent detection
//! - `session` - Visit lifecycle and app views

pub mod conversation;
pub mod entitlement;
pub mod foundation;
pub mod funnel;
pub mod session;
