//! Session aggregate entity.
//!
//! A session lives for one visit. It is created unauthenticated on page load,
//! flips to authenticated on login or signup, and is replaced by a fresh
//! session on logout.

use crate::domain::entitlement::SubscriptionTier;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

use super::AppView;

/// Session aggregate - who is looking at the app and what they see.
///
/// # Invariants
///
/// - `active_view`, `tier` and `coach_panel_open` only change while authenticated
/// - `tier` never moves to a lower rank within one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this visit.
    id: SessionId,

    /// Whether the visitor has logged in.
    authenticated: bool,

    /// Subscription tier.
    tier: SubscriptionTier,

    /// Main view currently shown.
    active_view: AppView,

    /// Whether the coach chat panel is open.
    coach_panel_open: bool,

    /// When the visit began.
    started_at: Timestamp,
}

impl Session {
    /// Create a new unauthenticated session on the free tier.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            authenticated: false,
            tier: SubscriptionTier::Free,
            active_view: AppView::Dashboard,
            coach_panel_open: false,
            started_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    pub fn active_view(&self) -> AppView {
        self.active_view
    }

    pub fn coach_panel_open(&self) -> bool {
        self.coach_panel_open
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark the session as logged in.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already authenticated
    pub fn authenticate(&mut self) -> Result<(), DomainError> {
        if self.authenticated {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session is already authenticated",
            ));
        }
        self.authenticated = true;
        self.active_view = AppView::Dashboard;
        Ok(())
    }

    /// Change the subscription tier, returning the previous one.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if not logged in
    /// - `InvalidStateTransition` if `tier` ranks below the current tier
    pub fn upgrade_tier(&mut self, tier: SubscriptionTier) -> Result<SubscriptionTier, DomainError> {
        self.ensure_authenticated("upgrade_tier")?;
        if tier.rank() < self.tier.rank() {
            return Err(DomainError::invalid_transition(self.tier, tier));
        }
        Ok(std::mem::replace(&mut self.tier, tier))
    }

    /// Switch the main view.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if not logged in
    pub fn navigate(&mut self, view: AppView) -> Result<(), DomainError> {
        self.ensure_authenticated("navigate")?;
        self.active_view = view;
        Ok(())
    }

    /// Open or close the coach panel, returning the new state.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if not logged in
    pub fn toggle_coach_panel(&mut self) -> Result<bool, DomainError> {
        self.ensure_authenticated("toggle_coach_panel")?;
        self.coach_panel_open = !self.coach_panel_open;
        Ok(self.coach_panel_open)
    }

    /// Validates that the session is logged in.
    pub fn ensure_authenticated(&self, operation: &str) -> Result<(), DomainError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(DomainError::unauthorized(operation))
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
