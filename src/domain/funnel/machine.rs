//! Conversion funnel state machine.
//!
//! Tracks the public screen, the exit-intent modal and the pricing selections
//! for one visit.
//!
//! # Invariants
//!
//! - The exit modal opens at most once per visit; `exit_modal_shown` never
//!   goes back to false on this machine
//! - Exit intent only counts on the pricing screen
//! - Every survey reason leads to the same downsell
//! - After conversion the machine accepts no further transitions

use serde::{Deserialize, Serialize};

use super::exit_intent::{EngagementSignal, ExitIntent, ExitIntentSubscription};
use super::offer::{BillingCycle, DownsellOffer, SurveyReason, DOWNSELL_OFFER};
use super::screen::{FunnelScreen, ModalStage};
use crate::domain::entitlement::{locked_features, SubscriptionTier};
use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};

/// Observable funnel state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelState {
    pub screen: FunnelScreen,
    pub modal_stage: ModalStage,
    pub exit_modal_shown: bool,
    pub billing_cycle: BillingCycle,
    pub pro_preview_open: bool,
    /// Last reason picked in the exit survey. Recorded, never branched on.
    pub survey_reason: Option<SurveyReason>,
}

/// Effect of an exit intent on the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIntentEffect {
    SurveyOpened,
    Ignored(ExitIntentIgnored),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIntentIgnored {
    /// No exit intent was detected in the signal.
    NoIntent,
    NotOnPricing,
    AlreadyShown,
    /// The funnel has already converted.
    Converted,
}

/// How a visitor converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum Conversion {
    /// Signed up straight from a screen.
    Direct {
        screen: FunnelScreen,
        billing_cycle: BillingCycle,
    },
    /// Claimed the downsell offer from the exit modal.
    Downsell { reason: Option<SurveyReason> },
}

/// Teaser of the Pro features a visitor would unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProPreview {
    pub features: Vec<&'static str>,
}

/// Funnel for one visit.
#[derive(Debug, Default)]
pub struct FunnelStateMachine {
    state: FunnelState,
    exit_intent: ExitIntentSubscription,
    converted: bool,
}

impl FunnelStateMachine {
    /// Creates a funnel on the landing screen with the pointer-exit detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a funnel fed by the given exit-intent subscription.
    pub fn with_subscription(exit_intent: ExitIntentSubscription) -> Self {
        Self {
            state: FunnelState::default(),
            exit_intent,
            converted: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &FunnelState {
        &self.state
    }

    pub fn screen(&self) -> FunnelScreen {
        self.state.screen
    }

    pub fn modal_stage(&self) -> ModalStage {
        self.state.modal_stage
    }

    pub fn exit_modal_shown(&self) -> bool {
        self.state.exit_modal_shown
    }

    pub fn is_converted(&self) -> bool {
        self.converted
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn navigate_to_pricing(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.state.screen = self.state.screen.transition_to(FunnelScreen::Pricing)?;
        self.state.pro_preview_open = false;
        tracing::debug!(screen = %self.state.screen, "funnel navigated");
        Ok(())
    }

    /// Returns to the landing screen, closing any open modal.
    pub fn back_to_landing(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.state.screen = self.state.screen.transition_to(FunnelScreen::Landing)?;
        self.state.modal_stage = ModalStage::Hidden;
        tracing::debug!(screen = %self.state.screen, "funnel navigated");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exit intent
    // ─────────────────────────────────────────────────────────────────────────

    /// Feeds a raw engagement signal through the exit-intent subscription.
    ///
    /// Signals outside the pricing screen are dropped before reaching the
    /// detector, so they cannot use up the subscription.
    pub fn on_signal(&mut self, signal: &EngagementSignal) -> ExitIntentEffect {
        if self.converted {
            return ExitIntentEffect::Ignored(ExitIntentIgnored::Converted);
        }
        if self.state.screen != FunnelScreen::Pricing {
            return ExitIntentEffect::Ignored(ExitIntentIgnored::NotOnPricing);
        }
        match self.exit_intent.feed(signal) {
            Some(intent) => self.on_exit_intent(intent),
            None if self.state.exit_modal_shown => {
                ExitIntentEffect::Ignored(ExitIntentIgnored::AlreadyShown)
            }
            None => ExitIntentEffect::Ignored(ExitIntentIgnored::NoIntent),
        }
    }

    /// Applies an exit-intent event.
    ///
    /// Opens the survey the first time it happens on the pricing screen.
    /// Every later occurrence is a no-op, whatever the modal stage.
    pub fn on_exit_intent(&mut self, intent: ExitIntent) -> ExitIntentEffect {
        if self.converted {
            return ExitIntentEffect::Ignored(ExitIntentIgnored::Converted);
        }
        if self.state.screen != FunnelScreen::Pricing {
            return ExitIntentEffect::Ignored(ExitIntentIgnored::NotOnPricing);
        }
        if self.state.exit_modal_shown {
            return ExitIntentEffect::Ignored(ExitIntentIgnored::AlreadyShown);
        }

        self.state.modal_stage = ModalStage::Survey;
        self.state.exit_modal_shown = true;
        tracing::info!(source = ?intent.source, "exit survey opened");
        ExitIntentEffect::SurveyOpened
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exit modal
    // ─────────────────────────────────────────────────────────────────────────

    /// Records the survey answer and moves to the downsell offer.
    pub fn select_survey_reason(&mut self, reason: SurveyReason) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.state.modal_stage = self.state.modal_stage.transition_to(ModalStage::Downsell)?;
        self.state.survey_reason = Some(reason);
        tracing::info!(reason = reason.label(), "exit survey answered");
        Ok(())
    }

    /// The offer on screen, while the modal is at the downsell stage.
    ///
    /// The same offer is shown whatever survey reason led there.
    pub fn downsell_offer(&self) -> Option<DownsellOffer> {
        match self.state.modal_stage {
            ModalStage::Downsell if !self.converted => Some(DOWNSELL_OFFER),
            _ => None,
        }
    }

    /// Closes the modal. The exit latch stays set.
    pub fn dismiss_modal(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.state.modal_stage = self.state.modal_stage.transition_to(ModalStage::Hidden)?;
        tracing::debug!("exit modal dismissed");
        Ok(())
    }

    /// Claims the downsell offer. Ends the funnel.
    pub fn claim_offer(&mut self) -> Result<Conversion, DomainError> {
        self.ensure_active()?;
        if self.state.modal_stage != ModalStage::Downsell {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "The offer can only be claimed from the downsell stage",
            )
            .with_detail("modal_stage", format!("{:?}", self.state.modal_stage)));
        }

        self.state.modal_stage = ModalStage::Hidden;
        self.converted = true;
        let conversion = Conversion::Downsell {
            reason: self.state.survey_reason,
        };
        tracing::info!(?conversion, "funnel converted");
        Ok(conversion)
    }

    /// Signs up directly from the current screen. Ends the funnel.
    pub fn sign_up(&mut self) -> Result<Conversion, DomainError> {
        self.ensure_active()?;
        self.state.modal_stage = ModalStage::Hidden;
        self.state.pro_preview_open = false;
        self.converted = true;
        let conversion = Conversion::Direct {
            screen: self.state.screen,
            billing_cycle: self.state.billing_cycle,
        };
        tracing::info!(?conversion, "funnel converted");
        Ok(conversion)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pricing selections and landing teaser
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_billing_cycle(&mut self, cycle: BillingCycle) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.state.billing_cycle = cycle;
        Ok(())
    }

    pub fn open_pro_preview(&mut self) -> Result<ProPreview, DomainError> {
        self.ensure_active()?;
        if self.state.screen != FunnelScreen::Landing {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "The Pro preview is only available on the landing screen",
            ));
        }
        self.state.pro_preview_open = true;
        Ok(self.pro_preview())
    }

    pub fn close_pro_preview(&mut self) {
        self.state.pro_preview_open = false;
    }

    /// Features a visitor on the free tier would unlock by going Pro.
    pub fn pro_preview(&self) -> ProPreview {
        ProPreview {
            features: locked_features(SubscriptionTier::Free),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.converted {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "The funnel has already converted",
            ))
        } else {
            Ok(())
        }
    }
}
