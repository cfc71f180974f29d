//! Pricing page selections: billing cycle and exit survey reasons.

use serde::{Deserialize, Serialize};

/// Billing cycle shown on the pricing cards. Exactly one is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    #[default]
    Yearly,
}

/// Reasons offered by the exit survey.
///
/// All reasons lead to the same downsell offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyReason {
    TooExpensive,
    JustBrowsing,
    NotEnoughFeatures,
    PrefersCasual,
}

impl SurveyReason {
    pub const ALL: [SurveyReason; 4] = [
        SurveyReason::TooExpensive,
        SurveyReason::JustBrowsing,
        SurveyReason::NotEnoughFeatures,
        SurveyReason::PrefersCasual,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SurveyReason::TooExpensive => "Too expensive",
            SurveyReason::JustBrowsing => "Just browsing",
            SurveyReason::NotEnoughFeatures => "Not enough features",
            SurveyReason::PrefersCasual => "I prefer being casual",
        }
    }
}

/// The one-time offer shown at the downsell stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownsellOffer {
    pub discount_percent: u8,
    pub applies_to: &'static str,
    pub expires_after_secs: u32,
}

/// The downsell offer is the same whatever reason was selected.
pub const DOWNSELL_OFFER: DownsellOffer = DownsellOffer {
    discount_percent: 50,
    applies_to: "first month",
    expires_after_secs: 300,
};
