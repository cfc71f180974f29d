//! Gated dashboard regions.
//!
//! Each region names the feature it shows and how it degrades when the
//! session's tier does not unlock that feature.

use serde::Serialize;

use super::table::{features, resolve};
use super::SubscriptionTier;
use crate::domain::session::AppView;

/// How a region renders when its feature is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockedPresentation {
    /// Content stays in place, blurred and non-interactive, under an upsell overlay.
    Blurred,
    /// Content is replaced by an upsell placeholder.
    UpsellOnly,
}

/// Upsell affordance shown over or instead of locked content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsellCopy {
    pub headline: &'static str,
    pub body: &'static str,
    pub call_to_action: &'static str,
    /// View the call to action navigates to.
    pub target_view: AppView,
}

/// What a region should render for the current tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderMode {
    Full,
    BlurredWithUpsell { upsell: UpsellCopy },
    UpsellOnly { upsell: UpsellCopy },
}

impl RenderMode {
    /// Returns true if the full content is rendered.
    pub fn is_full(&self) -> bool {
        matches!(self, RenderMode::Full)
    }

    /// Returns the upsell affordance, if any.
    pub fn upsell(&self) -> Option<&UpsellCopy> {
        match self {
            RenderMode::Full => None,
            RenderMode::BlurredWithUpsell { upsell } | RenderMode::UpsellOnly { upsell } => {
                Some(upsell)
            }
        }
    }
}

/// Dashboard regions that are gated by an entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedRegion {
    /// Morning briefing produced by the AI coach.
    AiInsight,
    /// Points balance and rewards redemption.
    Rewards,
    /// Community leaderboard boost.
    CommunityBoost,
}

impl GatedRegion {
    pub const ALL: [GatedRegion; 3] = [
        GatedRegion::AiInsight,
        GatedRegion::Rewards,
        GatedRegion::CommunityBoost,
    ];

    /// Feature tag that unlocks this region.
    pub fn feature_tag(&self) -> &'static str {
        match self {
            GatedRegion::AiInsight => features::AI_NEURAL_COACH,
            GatedRegion::Rewards => features::RETAIL_REWARDS,
            GatedRegion::CommunityBoost => features::COMMUNITY_BOOST,
        }
    }

    pub fn locked_presentation(&self) -> LockedPresentation {
        match self {
            GatedRegion::AiInsight | GatedRegion::Rewards => LockedPresentation::Blurred,
            GatedRegion::CommunityBoost => LockedPresentation::UpsellOnly,
        }
    }

    pub fn upsell(&self) -> UpsellCopy {
        match self {
            GatedRegion::AiInsight => UpsellCopy {
                headline: "AI Insight Locked",
                body: "Upgrade to unlock your daily recovery plan.",
                call_to_action: "UNLOCK ACCESS",
                target_view: AppView::Subscription,
            },
            GatedRegion::Rewards => UpsellCopy {
                headline: "You missed +450 pts this week.",
                body: "Pro members earn points on every logged session.",
                call_to_action: "Join Pro to claim",
                target_view: AppView::Subscription,
            },
            GatedRegion::CommunityBoost => UpsellCopy {
                headline: "Community Boost is a Pro feature",
                body: "Climb the leaderboard with your crew.",
                call_to_action: "UPGRADE TO PRO",
                target_view: AppView::Subscription,
            },
        }
    }

    /// Decides how this region renders for `tier`.
    pub fn render_mode(&self, tier: SubscriptionTier) -> RenderMode {
        if resolve(self.feature_tag(), tier).is_allowed() {
            return RenderMode::Full;
        }
        let upsell = self.upsell();
        match self.locked_presentation() {
            LockedPresentation::Blurred => RenderMode::BlurredWithUpsell { upsell },
            LockedPresentation::UpsellOnly => RenderMode::UpsellOnly { upsell },
        }
    }
}
