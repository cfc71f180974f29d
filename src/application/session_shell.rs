//! SessionShell - Named operations over the whole client session.
//!
//! Composes the session aggregate, the coach conversation and the public
//! funnel. Each operation checks which side of the login boundary it
//! belongs to before touching state.
//!
//! | Operation                          | Available when    |
//! |------------------------------------|-------------------|
//! | funnel operations, `signup`, `login` | logged out      |
//! | `upgrade_tier`, `navigate`, `toggle_coach_panel`, `ask_coach`, `logout` | logged in |
//! | `region`, `entitlement`, `comparison_rows` | always     |

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::conversation::ConversationSnapshot;
use crate::domain::entitlement::{
    comparison_rows, resolve, ComparisonRow, Entitlement, GatedRegion, RenderMode,
    SubscriptionTier,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::funnel::{
    BillingCycle, Conversion, DownsellOffer, EngagementSignal, ExitIntent, ExitIntentEffect,
    ExitIntentSubscription, FunnelStateMachine, ProPreview, SurveyReason,
};
use crate::domain::session::{AppView, Session};

use super::{AssistantSessionManager, SubmitOutcome};

/// Builds the exit-intent subscription for each new funnel.
pub type ExitIntentFactory = Arc<dyn Fn() -> ExitIntentSubscription + Send + Sync>;

/// The client session.
///
/// # Invariants
///
/// - The funnel exists exactly while the session is unauthenticated
/// - Logging out replaces the session, clears the conversation and starts a
///   fresh funnel with its exit latch unset
pub struct SessionShell {
    session: Session,
    assistant: AssistantSessionManager,
    funnel: Option<FunnelStateMachine>,
    exit_intent: ExitIntentFactory,
}

impl SessionShell {
    /// Creates a logged-out shell using the pointer-exit detector.
    pub fn new(assistant: AssistantSessionManager) -> Self {
        Self::with_exit_intent(assistant, Arc::new(ExitIntentSubscription::default))
    }

    /// Creates a logged-out shell whose funnels use the given detector factory.
    pub fn with_exit_intent(assistant: AssistantSessionManager, exit_intent: ExitIntentFactory) -> Self {
        let funnel = FunnelStateMachine::with_subscription(exit_intent());
        Self {
            session: Session::new(),
            assistant,
            funnel: Some(funnel),
            exit_intent,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.session.tier()
    }

    /// The public funnel, if logged out.
    pub fn funnel(&self) -> Option<&FunnelStateMachine> {
        self.funnel.as_ref()
    }

    /// The downsell offer on screen, if the funnel is at that stage.
    pub fn downsell_offer(&self) -> Option<DownsellOffer> {
        self.funnel.as_ref().and_then(FunnelStateMachine::downsell_offer)
    }

    pub fn conversation(&self) -> ConversationSnapshot {
        self.assistant.snapshot()
    }

    pub fn subscribe_conversation(&self) -> watch::Receiver<ConversationSnapshot> {
        self.assistant.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Logs in. The tier is left unchanged.
    pub fn login(&mut self) -> Result<(), DomainError> {
        self.session.authenticate()?;
        self.funnel = None;
        tracing::info!(session_id = %self.session.id(), tier = %self.session.tier(), "logged in");
        Ok(())
    }

    /// Logs out, starting over with a fresh session, conversation and funnel.
    pub fn logout(&mut self) -> Result<(), DomainError> {
        self.session.ensure_authenticated("logout")?;
        let previous = *self.session.id();

        self.session = Session::new();
        self.assistant.reset();
        self.funnel = Some(FunnelStateMachine::with_subscription((self.exit_intent)()));
        tracing::info!(session_id = %previous, "logged out");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authenticated operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves to a higher tier. Returns the previous tier.
    pub fn upgrade_tier(&mut self, tier: SubscriptionTier) -> Result<SubscriptionTier, DomainError> {
        let previous = self.session.upgrade_tier(tier)?;
        tracing::info!(from = %previous, to = %tier, "tier upgraded");
        Ok(previous)
    }

    pub fn navigate(&mut self, view: AppView) -> Result<(), DomainError> {
        self.session.navigate(view)?;
        tracing::debug!(%view, "view changed");
        Ok(())
    }

    /// Opens or closes the coach panel. Returns whether it is now open.
    pub fn toggle_coach_panel(&mut self) -> Result<bool, DomainError> {
        self.session.toggle_coach_panel()
    }

    /// Asks the coach a question.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn ask_coach(&self, query: &str) -> Result<SubmitOutcome, DomainError> {
        self.session.ensure_authenticated("ask_coach")?;
        Ok(self.assistant.submit(query))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entitlements
    // ─────────────────────────────────────────────────────────────────────────

    /// How a dashboard region renders for the current tier.
    pub fn region(&self, region: GatedRegion) -> RenderMode {
        region.render_mode(self.session.tier())
    }

    pub fn entitlement(&self, feature_tag: &str) -> Entitlement {
        resolve(feature_tag, self.session.tier())
    }

    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        comparison_rows()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Public funnel
    // ─────────────────────────────────────────────────────────────────────────

    pub fn navigate_to_pricing(&mut self) -> Result<(), DomainError> {
        self.funnel_mut("navigate_to_pricing")?.navigate_to_pricing()
    }

    pub fn back_to_landing(&mut self) -> Result<(), DomainError> {
        self.funnel_mut("back_to_landing")?.back_to_landing()
    }

    pub fn on_signal(&mut self, signal: &EngagementSignal) -> Result<ExitIntentEffect, DomainError> {
        Ok(self.funnel_mut("on_signal")?.on_signal(signal))
    }

    pub fn on_exit_intent(&mut self, intent: ExitIntent) -> Result<ExitIntentEffect, DomainError> {
        Ok(self.funnel_mut("on_exit_intent")?.on_exit_intent(intent))
    }

    pub fn select_survey_reason(&mut self, reason: SurveyReason) -> Result<(), DomainError> {
        self.funnel_mut("select_survey_reason")?.select_survey_reason(reason)
    }

    pub fn dismiss_modal(&mut self) -> Result<(), DomainError> {
        self.funnel_mut("dismiss_modal")?.dismiss_modal()
    }

    pub fn select_billing_cycle(&mut self, cycle: BillingCycle) -> Result<(), DomainError> {
        self.funnel_mut("select_billing_cycle")?.select_billing_cycle(cycle)
    }

    pub fn open_pro_preview(&mut self) -> Result<ProPreview, DomainError> {
        self.funnel_mut("open_pro_preview")?.open_pro_preview()
    }

    pub fn close_pro_preview(&mut self) -> Result<(), DomainError> {
        self.funnel_mut("close_pro_preview")?.close_pro_preview();
        Ok(())
    }

    /// Claims the downsell offer, then logs in and drops the funnel.
    pub fn claim_offer(&mut self) -> Result<Conversion, DomainError> {
        let conversion = self.funnel_mut("claim_offer")?.claim_offer()?;
        self.complete_conversion()?;
        Ok(conversion)
    }

    /// Signs up from the funnel, then logs in and drops the funnel.
    pub fn signup(&mut self) -> Result<Conversion, DomainError> {
        let conversion = self.funnel_mut("signup")?.sign_up()?;
        self.complete_conversion()?;
        Ok(conversion)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn funnel_mut(&mut self, operation: &str) -> Result<&mut FunnelStateMachine, DomainError> {
        if self.session.is_authenticated() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Operation '{}' is only available before login", operation),
            ));
        }
        self.funnel.as_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Funnel missing for a logged-out session")
        })
    }

    fn complete_conversion(&mut self) -> Result<(), DomainError> {
        self.session.authenticate()?;
        self.funnel = None;
        tracing::info!(session_id = %self.session.id(), "signed up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAssistantGateway;
    use crate::domain::conversation::Resolution;
    use crate::domain::entitlement::features;
    use crate::domain::funnel::{ExitIntentSource, ModalStage, ScrollDepthDetector, DOWNSELL_OFFER};

    fn shell_with(gateway: MockAssistantGateway) -> SessionShell {
        SessionShell::new(AssistantSessionManager::new(Arc::new(gateway)))
    }

    fn shell() -> SessionShell {
        shell_with(MockAssistantGateway::new())
    }

    fn logged_in() -> SessionShell {
        let mut shell = shell();
        shell.login().unwrap();
        shell
    }

    fn pointer_exit() -> ExitIntent {
        ExitIntent::new(ExitIntentSource::PointerExit)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn starts_logged_out_with_funnel() {
        let shell = shell();
        assert!(!shell.is_authenticated());
        assert_eq!(shell.tier(), SubscriptionTier::Free);
        assert!(shell.funnel().is_some());
    }

    #[test]
    fn login_drops_funnel_and_keeps_tier() {
        let shell = logged_in();
        assert!(shell.is_authenticated());
        assert_eq!(shell.tier(), SubscriptionTier::Free);
        assert!(shell.funnel().is_none());
    }

    #[test]
    fn login_twice_is_invalid() {
        let mut shell = logged_in();
        let err = shell.login().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn logout_requires_login() {
        let mut shell = shell();
        assert_eq!(shell.logout().unwrap_err().code, ErrorCode::Unauthorized);
    }

    #[test]
    fn logout_resets_session_view_and_panel() {
        let mut shell = logged_in();
        shell.upgrade_tier(SubscriptionTier::Pro).unwrap();
        shell.navigate(AppView::Lab).unwrap();
        shell.toggle_coach_panel().unwrap();
        let old_id = *shell.session().id();

        shell.logout().unwrap();

        let session = shell.session();
        assert!(!session.is_authenticated());
        assert_eq!(session.active_view(), AppView::Dashboard);
        assert!(!session.coach_panel_open());
        assert_eq!(session.tier(), SubscriptionTier::Free);
        assert_ne!(*session.id(), old_id);
    }

    #[tokio::test]
    async fn logout_clears_conversation() {
        let mut shell = shell_with(MockAssistantGateway::new().with_reply("ok"));
        shell.login().unwrap();
        let pending = shell.ask_coach("hello").unwrap().accepted().unwrap();
        pending.settled().await;
        assert_eq!(shell.conversation().history.len(), 2);

        shell.logout().unwrap();
        assert_eq!(shell.conversation(), ConversationSnapshot::default());
    }

    #[test]
    fn logout_resets_exit_latch() {
        let mut shell = shell();
        shell.navigate_to_pricing().unwrap();
        shell.on_exit_intent(pointer_exit()).unwrap();
        shell.dismiss_modal().unwrap();
        assert!(shell.funnel().unwrap().exit_modal_shown());

        shell.login().unwrap();
        shell.logout().unwrap();

        let funnel = shell.funnel().unwrap();
        assert!(!funnel.exit_modal_shown());
        assert_eq!(funnel.modal_stage(), ModalStage::Hidden);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth boundary
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn authenticated_operations_are_unauthorized_when_logged_out() {
        let mut shell = shell();
        assert_eq!(
            shell.upgrade_tier(SubscriptionTier::Pro).unwrap_err().code,
            ErrorCode::Unauthorized
        );
        assert_eq!(shell.navigate(AppView::Lab).unwrap_err().code, ErrorCode::Unauthorized);
        assert_eq!(shell.toggle_coach_panel().unwrap_err().code, ErrorCode::Unauthorized);
        assert_eq!(shell.ask_coach("hi").unwrap_err().code, ErrorCode::Unauthorized);
        assert_eq!(shell.conversation(), ConversationSnapshot::default());
    }

    #[test]
    fn funnel_operations_are_invalid_when_logged_in() {
        let mut shell = logged_in();
        assert_eq!(
            shell.navigate_to_pricing().unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
        assert_eq!(
            shell.on_exit_intent(pointer_exit()).unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
        assert_eq!(shell.signup().unwrap_err().code, ErrorCode::InvalidStateTransition);
        assert_eq!(
            shell.select_billing_cycle(BillingCycle::Monthly).unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn signup_authenticates_and_discards_funnel() {
        let mut shell = shell();
        shell.navigate_to_pricing().unwrap();
        shell.select_billing_cycle(BillingCycle::Monthly).unwrap();

        let conversion = shell.signup().unwrap();

        assert_eq!(
            conversion,
            Conversion::Direct {
                screen: crate::domain::funnel::FunnelScreen::Pricing,
                billing_cycle: BillingCycle::Monthly,
            }
        );
        assert!(shell.is_authenticated());
        assert!(shell.funnel().is_none());
    }

    #[test]
    fn claimed_offer_authenticates() {
        let mut shell = shell();
        shell.navigate_to_pricing().unwrap();
        assert_eq!(
            shell.on_exit_intent(pointer_exit()).unwrap(),
            ExitIntentEffect::SurveyOpened
        );
        shell.select_survey_reason(SurveyReason::TooExpensive).unwrap();
        assert_eq!(shell.downsell_offer(), Some(DOWNSELL_OFFER));

        let conversion = shell.claim_offer().unwrap();
        assert_eq!(shell.downsell_offer(), None);

        assert_eq!(
            conversion,
            Conversion::Downsell {
                reason: Some(SurveyReason::TooExpensive)
            }
        );
        assert!(shell.is_authenticated());
        assert!(shell.funnel().is_none());
    }

    #[test]
    fn claim_offer_outside_downsell_keeps_funnel() {
        let mut shell = shell();
        shell.navigate_to_pricing().unwrap();

        let err = shell.claim_offer().unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(!shell.is_authenticated());
        assert!(shell.funnel().is_some());
    }

    #[test]
    fn custom_exit_intent_factory_is_used_for_every_funnel() {
        let assistant = AssistantSessionManager::new(Arc::new(MockAssistantGateway::new()));
        let mut shell = SessionShell::with_exit_intent(
            assistant,
            Arc::new(|| ExitIntentSubscription::new(Box::new(ScrollDepthDetector::new(80)))),
        );
        shell.navigate_to_pricing().unwrap();

        let pointer = EngagementSignal::PointerLeft { client_y: -1 };
        assert!(matches!(
            shell.on_signal(&pointer).unwrap(),
            ExitIntentEffect::Ignored(_)
        ));
        let scroll = EngagementSignal::ScrollDepth { percent: 90 };
        assert_eq!(shell.on_signal(&scroll).unwrap(), ExitIntentEffect::SurveyOpened);

        shell.login().unwrap();
        shell.logout().unwrap();
        assert_eq!(shell.funnel().unwrap().state().modal_stage, ModalStage::Hidden);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entitlements
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn free_tier_sees_locked_regions() {
        let shell = logged_in();
        assert!(!shell.entitlement(features::AI_NEURAL_COACH).is_allowed());
        assert!(matches!(
            shell.region(GatedRegion::AiInsight),
            RenderMode::BlurredWithUpsell { .. }
        ));
        assert!(matches!(
            shell.region(GatedRegion::CommunityBoost),
            RenderMode::UpsellOnly { .. }
        ));
    }

    #[test]
    fn upgrading_unlocks_regions() {
        let mut shell = logged_in();
        shell.upgrade_tier(SubscriptionTier::Pro).unwrap();
        for region in GatedRegion::ALL {
            assert!(shell.region(region).is_full());
        }
        assert!(shell.entitlement(features::RETAIL_REWARDS).is_allowed());
    }

    #[test]
    fn unknown_features_are_denied() {
        let mut shell = logged_in();
        shell.upgrade_tier(SubscriptionTier::Pro).unwrap();
        assert!(!shell.entitlement("Teleportation").is_allowed());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Coach
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn ask_coach_delegates_to_assistant() {
        let mut shell = shell_with(MockAssistantGateway::new().with_reply("~600 kcal"));
        shell.login().unwrap();

        let pending = shell
            .ask_coach("How many calories today?")
            .unwrap()
            .accepted()
            .unwrap();
        assert_eq!(pending.settled().await, Resolution::Answered);

        let snapshot = shell.conversation();
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[1].text(), "~600 kcal");
        assert!(!snapshot.pending);
    }
}
