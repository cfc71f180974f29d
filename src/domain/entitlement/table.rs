//! Entitlement table and resolver.
//!
//! The table is data: adding a feature or moving it between tiers is a
//! one-line change to [`ENTITLEMENTS`].
//!
//! # Feature Table
//!
//! | Feature | Required tier |
//! |---------|---------------|
//! | Manual Logging | Free |
//! | Basic Stats | Free |
//! | AI Neural Coach | Pro |
//! | Retail Rewards | Pro |
//! | Community Boost | Pro |
//!
//! Unknown tags fail closed: they resolve to not-allowed for every tier.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::SubscriptionTier;

/// Canonical feature tags.
pub mod features {
    pub const MANUAL_LOGGING: &str = "Manual Logging";
    pub const BASIC_STATS: &str = "Basic Stats";
    pub const AI_NEURAL_COACH: &str = "AI Neural Coach";
    pub const RETAIL_REWARDS: &str = "Retail Rewards";
    pub const COMMUNITY_BOOST: &str = "Community Boost";
}

/// One row of the entitlement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitlementFact {
    /// Feature tag as shown in the pricing breakdown.
    pub feature_tag: &'static str,
    /// Lowest tier that unlocks the feature.
    pub required_tier: SubscriptionTier,
}

impl EntitlementFact {
    const fn new(feature_tag: &'static str, required_tier: SubscriptionTier) -> Self {
        Self {
            feature_tag,
            required_tier,
        }
    }
}

/// The static entitlement table, in display order.
pub const ENTITLEMENTS: &[EntitlementFact] = &[
    EntitlementFact::new(features::MANUAL_LOGGING, SubscriptionTier::Free),
    EntitlementFact::new(features::BASIC_STATS, SubscriptionTier::Free),
    EntitlementFact::new(features::AI_NEURAL_COACH, SubscriptionTier::Pro),
    EntitlementFact::new(features::RETAIL_REWARDS, SubscriptionTier::Pro),
    EntitlementFact::new(features::COMMUNITY_BOOST, SubscriptionTier::Pro),
];

static INDEX: Lazy<HashMap<String, SubscriptionTier>> = Lazy::new(|| {
    ENTITLEMENTS
        .iter()
        .map(|fact| (normalize(fact.feature_tag), fact.required_tier))
        .collect()
});

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// Allow/deny decision for a feature tag under a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub allowed: bool,
}

impl Entitlement {
    /// Returns true if the feature may render in full.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Returns true if the feature must render its locked variant.
    pub fn is_locked(&self) -> bool {
        !self.allowed
    }
}

/// Returns the tier required for a feature tag, if the tag is known.
pub fn required_tier(feature_tag: &str) -> Option<SubscriptionTier> {
    INDEX.get(&normalize(feature_tag)).copied()
}

/// Resolves a feature tag against a tier.
///
/// Total and side-effect free. Unknown tags are denied.
pub fn resolve(feature_tag: &str, tier: SubscriptionTier) -> Entitlement {
    let allowed = required_tier(feature_tag)
        .map(|required| tier.satisfies(required))
        .unwrap_or(false);
    Entitlement { allowed }
}

/// Features a tier does not unlock, in table order.
pub fn locked_features(tier: SubscriptionTier) -> Vec<&'static str> {
    ENTITLEMENTS
        .iter()
        .filter(|fact| !tier.satisfies(fact.required_tier))
        .map(|fact| fact.feature_tag)
        .collect()
}

/// A row of the pricing comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub feature: &'static str,
    pub free: bool,
    pub pro: bool,
}

/// Derives the pricing comparison table from [`ENTITLEMENTS`].
pub fn comparison_rows() -> Vec<ComparisonRow> {
    ENTITLEMENTS
        .iter()
        .map(|fact| ComparisonRow {
            feature: fact.feature_tag,
            free: resolve(fact.feature_tag, SubscriptionTier::Free).allowed,
            pro: resolve(fact.feature_tag, SubscriptionTier::Pro).allowed,
        })
        .collect()
}
