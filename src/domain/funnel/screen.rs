//! Acquisition screens and the exit-intent modal stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Public acquisition screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelScreen {
    #[default]
    Landing,
    Pricing,
}

impl StateMachine for FunnelScreen {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FunnelScreen::*;
        matches!((self, target), (Landing, Pricing) | (Pricing, Landing))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            FunnelScreen::Landing => vec![FunnelScreen::Pricing],
            FunnelScreen::Pricing => vec![FunnelScreen::Landing],
        }
    }
}

impl fmt::Display for FunnelScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FunnelScreen::Landing => "landing",
            FunnelScreen::Pricing => "pricing",
        };
        write!(f, "{}", s)
    }
}

/// Stage of the exit-intent modal on the pricing screen.
///
/// Valid transitions:
/// - Hidden -> Survey (exit intent, first occurrence only)
/// - Survey -> Downsell (any survey reason)
/// - Survey -> Hidden, Downsell -> Hidden (dismissal)
///
/// Conversion out of Downsell ends the funnel and is not a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalStage {
    #[default]
    #[serde(rename = "none")]
    Hidden,
    Survey,
    Downsell,
}

impl StateMachine for ModalStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ModalStage::*;
        matches!(
            (self, target),
            (Hidden, Survey) | (Survey, Downsell) | (Survey, Hidden) | (Downsell, Hidden)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ModalStage::*;
        match self {
            Hidden => vec![Survey],
            Survey => vec![Downsell, Hidden],
            Downsell => vec![Hidden],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screens_toggle_between_landing_and_pricing() {
        assert_eq!(
            FunnelScreen::Landing.transition_to(FunnelScreen::Pricing).unwrap(),
            FunnelScreen::Pricing
        );
        assert!(FunnelScreen::Pricing.can_transition_to(&FunnelScreen::Landing));
        assert!(FunnelScreen::Landing.transition_to(FunnelScreen::Landing).is_err());
    }

    #[test]
    fn survey_cannot_be_reentered_from_downsell() {
        assert!(!ModalStage::Downsell.can_transition_to(&ModalStage::Survey));
        assert!(!ModalStage::Hidden.can_transition_to(&ModalStage::Downsell));
    }

    #[test]
    fn no_modal_stage_is_terminal() {
        for stage in [ModalStage::Hidden, ModalStage::Survey, ModalStage::Downsell] {
            assert!(!stage.is_terminal());
        }
    }

    #[test]
    fn modal_stage_serializes_hidden_as_none() {
        assert_eq!(serde_json::to_string(&ModalStage::Hidden).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&ModalStage::Downsell).unwrap(), "\"downsell\"");
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for stage in [ModalStage::Hidden, ModalStage::Survey, ModalStage::Downsell] {
            for target in stage.valid_transitions() {
                assert!(stage.can_transition_to(&target));
            }
        }
    }
}
