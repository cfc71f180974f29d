//! Conversion funnel domain module.
//!
//! Landing → pricing → exit-intent survey → downsell → signup.
//!
//! # Module Structure
//!
//! - `screen` - FunnelScreen and ModalStage state machines
//! - `offer` - Billing cycle, survey reasons and the downsell offer
//! - `exit_intent` - Signal detectors and the one-shot subscription
//! - `machine` - FunnelStateMachine composing the above

mod exit_intent;
mod machine;
mod offer;
mod screen;

pub use exit_intent::{
    DwellTimeDetector, EngagementSignal, ExitIntent, ExitIntentDetector, ExitIntentSource,
    ExitIntentSubscription, PointerExitDetector, ScrollDepthDetector,
};
pub use machine::{
    Conversion, ExitIntentEffect, ExitIntentIgnored, FunnelState, FunnelStateMachine, ProPreview,
};
pub use offer::{BillingCycle, DownsellOffer, SurveyReason, DOWNSELL_OFFER};
pub use screen::{FunnelScreen, ModalStage};
