//! Momentum - Client session core.
//!
//! Decides what a visitor sees and what they may do: which features their
//! subscription tier unlocks, how the coach conversation behaves while a
//! request is in flight, and how the public pricing funnel reacts to
//! exit intent.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
