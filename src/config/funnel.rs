//! Funnel configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::funnel::{
    DwellTimeDetector, ExitIntentDetector, ExitIntentSubscription, PointerExitDetector,
    ScrollDepthDetector,
};

/// Funnel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FunnelConfig {
    /// Which engagement signal counts as exit intent
    #[serde(default)]
    pub exit_trigger: ExitTrigger,

    /// Seconds on the pricing page before the dwell trigger fires
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: u64,

    /// Scroll depth at which the scroll trigger fires
    #[serde(default = "default_scroll_depth_percent")]
    pub scroll_depth_percent: u8,
}

/// Exit-intent trigger kind
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExitTrigger {
    #[default]
    Pointer,
    Dwell,
    Scroll,
}

impl FunnelConfig {
    /// Builds the configured detector.
    pub fn detector(&self) -> Box<dyn ExitIntentDetector> {
        match self.exit_trigger {
            ExitTrigger::Pointer => Box::new(PointerExitDetector),
            ExitTrigger::Dwell => Box::new(DwellTimeDetector::new(Duration::from_secs(self.dwell_secs))),
            ExitTrigger::Scroll => Box::new(ScrollDepthDetector::new(self.scroll_depth_percent)),
        }
    }

    /// Builds a fresh one-shot subscription around the configured detector.
    pub fn subscription(&self) -> ExitIntentSubscription {
        ExitIntentSubscription::new(self.detector())
    }

    /// Validate funnel configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dwell_secs == 0 {
            return Err(ValidationError::InvalidDwellTime);
        }
        if self.scroll_depth_percent == 0 || self.scroll_depth_percent > 100 {
            return Err(ValidationError::InvalidScrollDepth);
        }
        Ok(())
    }
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            exit_trigger: ExitTrigger::default(),
            dwell_secs: default_dwell_secs(),
            scroll_depth_percent: default_scroll_depth_percent(),
        }
    }
}

fn default_dwell_secs() -> u64 {
    30
}

fn default_scroll_depth_percent() -> u8 {
    80
}
