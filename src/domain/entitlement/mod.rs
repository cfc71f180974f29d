//! Entitlement domain module.
//!
//! Decides, per feature and tier, whether content is unlocked.
//!
//! # Module Structure
//!
//! - `tier` - SubscriptionTier levels
//! - `table` - Static entitlement table and the fail-closed resolver
//! - `region` - Dashboard regions and their locked presentations

mod region;
mod table;
mod tier;

pub use region::{GatedRegion, LockedPresentation, RenderMode, UpsellCopy};
pub use table::{
    comparison_rows, features, locked_features, required_tier, resolve, ComparisonRow,
    Entitlement, EntitlementFact, ENTITLEMENTS,
};
pub use tier::SubscriptionTier;
