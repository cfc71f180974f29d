//! Exit-intent detection.
//!
//! Raw engagement signals are turned into a single [`ExitIntent`] domain event
//! by an [`ExitIntentDetector`]. The [`ExitIntentSubscription`] owns exactly one
//! detector and emits at most once, so the funnel never sees raw device input.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::Timestamp;

/// Raw environmental signal from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngagementSignal {
    /// Pointer left the document; `client_y` is its last vertical position.
    PointerLeft { client_y: i32 },
    /// Time spent on the current screen.
    TimeOnPage { elapsed: Duration },
    /// How far the page has been scrolled, 0-100.
    ScrollDepth { percent: u8 },
}

/// Which detector produced an exit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitIntentSource {
    PointerExit,
    DwellTime,
    ScrollDepth,
}

/// Domain event: the visitor is likely about to abandon the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitIntent {
    pub source: ExitIntentSource,
    pub detected_at: Timestamp,
}

impl ExitIntent {
    pub fn new(source: ExitIntentSource) -> Self {
        Self {
            source,
            detected_at: Timestamp::now(),
        }
    }
}

/// Turns raw signals into exit intents.
///
/// Detectors only classify; debouncing is the subscription's job.
pub trait ExitIntentDetector: Send + Sync {
    /// Returns the source if `signal` indicates exit intent.
    fn detect(&self, signal: &EngagementSignal) -> Option<ExitIntentSource>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

/// Fires when the pointer leaves through the top edge of the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerExitDetector;

impl ExitIntentDetector for PointerExitDetector {
    fn detect(&self, signal: &EngagementSignal) -> Option<ExitIntentSource> {
        match signal {
            EngagementSignal::PointerLeft { client_y } if *client_y <= 0 => {
                Some(ExitIntentSource::PointerExit)
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "pointer_exit"
    }
}

/// Fires once the visitor has lingered past a threshold.
#[derive(Debug, Clone, Copy)]
pub struct DwellTimeDetector {
    threshold: Duration,
}

impl DwellTimeDetector {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

impl ExitIntentDetector for DwellTimeDetector {
    fn detect(&self, signal: &EngagementSignal) -> Option<ExitIntentSource> {
        match signal {
            EngagementSignal::TimeOnPage { elapsed } if *elapsed >= self.threshold => {
                Some(ExitIntentSource::DwellTime)
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "dwell_time"
    }
}

/// Fires once the page has been scrolled past a depth.
#[derive(Debug, Clone, Copy)]
pub struct ScrollDepthDetector {
    threshold_percent: u8,
}

impl ScrollDepthDetector {
    pub fn new(threshold_percent: u8) -> Self {
        Self {
            threshold_percent: threshold_percent.min(100),
        }
    }
}

impl ExitIntentDetector for ScrollDepthDetector {
    fn detect(&self, signal: &EngagementSignal) -> Option<ExitIntentSource> {
        match signal {
            EngagementSignal::ScrollDepth { percent } if *percent >= self.threshold_percent => {
                Some(ExitIntentSource::ScrollDepth)
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "scroll_depth"
    }
}

/// Single subscription between one detector and the funnel.
///
/// Emits at most one [`ExitIntent`] over its lifetime.
pub struct ExitIntentSubscription {
    detector: Box<dyn ExitIntentDetector>,
    emitted: bool,
}

impl ExitIntentSubscription {
    pub fn new(detector: Box<dyn ExitIntentDetector>) -> Self {
        Self {
            detector,
            emitted: false,
        }
    }

    /// Feeds a raw signal; returns the exit intent the first time it is detected.
    pub fn feed(&mut self, signal: &EngagementSignal) -> Option<ExitIntent> {
        if self.emitted {
            return None;
        }
        let source = self.detector.detect(signal)?;
        self.emitted = true;
        tracing::debug!(detector = self.detector.name(), "exit intent detected");
        Some(ExitIntent::new(source))
    }

    pub fn has_emitted(&self) -> bool {
        self.emitted
    }
}

impl Default for ExitIntentSubscription {
    fn default() -> Self {
        Self::new(Box::new(PointerExitDetector))
    }
}

impl std::fmt::Debug for ExitIntentSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitIntentSubscription")
            .field("detector", &self.detector.name())
            .field("emitted", &self.emitted)
            .finish()
    }
}
