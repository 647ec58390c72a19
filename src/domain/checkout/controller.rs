//! CheckoutController - lifecycle around one checkout attempt.
//!
//! # Phases
//!
//! ```text
//! Loading ──┬──> Active ────> Exited
//!           └──> NotFound ──> Exited
//! ```
//!
//! The course lookup is the only suspension point and happens outside this
//! type: the application layer awaits the lookup, then feeds the result to
//! [`CheckoutController::resolve_course`]. Everything else is synchronous.

use serde::Serialize;

use super::{
    CheckoutEvent, CheckoutSession, CheckoutStage, CourseDescriptor, NavigationTarget,
    StepEvent, StepIndicator, StepView, TransitionOutcome,
};
use crate::domain::foundation::{
    CheckoutId, CourseId, DomainError, EventId, Locale, StateMachine, Timestamp,
};

/// Lifecycle phase of a checkout controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Waiting for the course lookup.
    Loading,
    /// Course resolved, the transition table is live.
    Active,
    /// Lookup failed or found nothing.
    NotFound,
    /// Learner left the flow.
    Exited,
}

impl StateMachine for CheckoutPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            CheckoutPhase::Loading => vec![CheckoutPhase::Active, CheckoutPhase::NotFound],
            CheckoutPhase::Active => vec![CheckoutPhase::Exited],
            CheckoutPhase::NotFound => vec![CheckoutPhase::Exited],
            CheckoutPhase::Exited => vec![],
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckoutPhase::Loading => "loading",
            CheckoutPhase::Active => "active",
            CheckoutPhase::NotFound => "not_found",
            CheckoutPhase::Exited => "exited",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
enum ControllerState {
    Loading,
    Active(Box<CheckoutSession>),
    NotFound,
    Exited(NavigationTarget),
}

/// "Step X of Y" as shown above the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepPosition {
    pub current: usize,
    pub total: usize,
}

/// Everything the host needs to render the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutView {
    Loading {
        checkout_id: CheckoutId,
        course_id: CourseId,
    },
    Active {
        checkout_id: CheckoutId,
        stage: CheckoutStage,
        position: Option<StepPosition>,
        indicator: StepIndicator,
        step: StepView,
    },
    /// Full-page replacement; the only affordance is returning to the catalogue.
    NotFound {
        checkout_id: CheckoutId,
        course_id: CourseId,
    },
    Exited {
        checkout_id: CheckoutId,
        target: NavigationTarget,
    },
}

/// Owns the checkout session and composes the indicator with the active view.
#[derive(Debug, Clone)]
pub struct CheckoutController {
    id: CheckoutId,
    course_id: CourseId,
    locale: Locale,
    state: ControllerState,
    created_at: Timestamp,
    updated_at: Timestamp,
    domain_events: Vec<CheckoutEvent>,
}

impl CheckoutController {
    /// Mounts a checkout for a course. The controller starts in Loading.
    pub fn begin(course_id: CourseId, locale: Locale) -> Self {
        let id = CheckoutId::new();
        let now = Timestamp::now();
        let mut controller = Self {
            id,
            course_id: course_id.clone(),
            locale,
            state: ControllerState::Loading,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };
        controller.record_event(CheckoutEvent::Started {
            event_id: EventId::new(),
            checkout_id: id,
            course_id,
            locale,
            occurred_at: now,
        });
        controller
    }

    pub fn id(&self) -> CheckoutId {
        self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn phase(&self) -> CheckoutPhase {
        match self.state {
            ControllerState::Loading => CheckoutPhase::Loading,
            ControllerState::Active(_) => CheckoutPhase::Active,
            ControllerState::NotFound => CheckoutPhase::NotFound,
            ControllerState::Exited(_) => CheckoutPhase::Exited,
        }
    }

    /// Returns the checkout session once the course is resolved.
    pub fn session(&self) -> Option<&CheckoutSession> {
        match &self.state {
            ControllerState::Active(session) => Some(&**session),
            _ => None,
        }
    }

    /// Returns where the learner was sent, once exited.
    pub fn exit_target(&self) -> Option<&NavigationTarget> {
        match &self.state {
            ControllerState::Exited(target) => Some(target),
            _ => None,
        }
    }

    /// Applies the lookup result. `None` covers both not-found and fetch
    /// failure; either is terminal.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the course was already resolved.
    pub fn resolve_course(
        &mut self,
        course: Option<CourseDescriptor>,
    ) -> Result<CheckoutPhase, DomainError> {
        let target = if course.is_some() {
            CheckoutPhase::Active
        } else {
            CheckoutPhase::NotFound
        };
        let next = self
            .phase()
            .transition_to(target)
            .map_err(|e| e.with_detail("current", self.phase().to_string()))?;

        match course {
            Some(course) => {
                let session =
                    CheckoutSession::start(self.id, self.course_id.clone(), course, self.locale);
                self.state = ControllerState::Active(Box::new(session));
                self.absorb_session_events();
            }
            None => {
                self.state = ControllerState::NotFound;
                self.record_event(CheckoutEvent::CourseNotFound {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    course_id: self.course_id.clone(),
                    occurred_at: Timestamp::now(),
                });
            }
        }
        self.updated_at = Timestamp::now();
        Ok(next)
    }

    /// Routes a step event through the current phase.
    ///
    /// Never fails: events that do not apply come back as
    /// [`TransitionOutcome::Ignored`].
    pub fn dispatch(&mut self, event: StepEvent) -> TransitionOutcome {
        let outcome = match &mut self.state {
            ControllerState::Loading => TransitionOutcome::Ignored {
                event: event.name(),
                reason: "course is still loading".to_string(),
            },
            ControllerState::Exited(_) => TransitionOutcome::Ignored {
                event: event.name(),
                reason: "checkout already exited".to_string(),
            },
            ControllerState::NotFound => match event {
                StepEvent::ReturnToCatalogue => TransitionOutcome::Exited {
                    target: NavigationTarget::Catalogue,
                },
                other => TransitionOutcome::Ignored {
                    event: other.name(),
                    reason: "course not found, only return to catalogue is offered".to_string(),
                },
            },
            ControllerState::Active(session) => session.apply(event),
        };

        self.absorb_session_events();
        if let TransitionOutcome::Exited { target } = &outcome {
            self.exit(target.clone());
        }
        if !outcome.is_ignored() {
            self.updated_at = Timestamp::now();
        }
        outcome
    }

    /// Builds the render model for the current phase.
    pub fn view(&self) -> CheckoutView {
        match &self.state {
            ControllerState::Loading => CheckoutView::Loading {
                checkout_id: self.id,
                course_id: self.course_id.clone(),
            },
            ControllerState::NotFound => CheckoutView::NotFound {
                checkout_id: self.id,
                course_id: self.course_id.clone(),
            },
            ControllerState::Exited(target) => CheckoutView::Exited {
                checkout_id: self.id,
                target: target.clone(),
            },
            ControllerState::Active(session) => {
                let indicator =
                    StepIndicator::project(session.steps().steps(), session.current_stage());
                let position = indicator
                    .position()
                    .map(|(current, total)| StepPosition { current, total });
                CheckoutView::Active {
                    checkout_id: self.id,
                    stage: session.current_stage(),
                    position,
                    indicator,
                    step: StepView::for_session(session),
                }
            }
        }
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CheckoutEvent> {
        self.absorb_session_events();
        std::mem::take(&mut self.domain_events)
    }

    fn exit(&mut self, target: NavigationTarget) {
        self.state = ControllerState::Exited(target.clone());
        self.record_event(CheckoutEvent::Exited {
            event_id: EventId::new(),
            checkout_id: self.id,
            target,
            occurred_at: Timestamp::now(),
        });
    }

    fn absorb_session_events(&mut self) {
        if let ControllerState::Active(session) = &mut self.state {
            let events = session.take_events();
            self.domain_events.extend(events);
        }
    }

    fn record_event(&mut self, event: CheckoutEvent) {
        self.domain_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::test_support::{
        course, plan, receipt, scheduled_course, self_paced_course, session,
    };
    use crate::domain::checkout::{CourseFormat, PaymentStatus, StepVisualStatus};
    use crate::domain::foundation::{DomainEvent, ErrorCode};
    use proptest::prelude::*;

    fn course_id() -> CourseId {
        CourseId::new("abc").unwrap()
    }

    fn active(course: CourseDescriptor) -> CheckoutController {
        let mut controller = CheckoutController::begin(course.id.clone(), Locale::En);
        controller.resolve_course(Some(course)).unwrap();
        controller
    }

    fn event_types(controller: &mut CheckoutController) -> Vec<&'static str> {
        controller
            .take_events()
            .iter()
            .map(|e| e.event_type())
            .collect()
    }

    // ───────────────────────────────────────────────────────────────
    // Phase machine
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn phase_transitions_follow_lifecycle() {
        assert!(CheckoutPhase::Loading.can_transition_to(&CheckoutPhase::Active));
        assert!(CheckoutPhase::Loading.can_transition_to(&CheckoutPhase::NotFound));
        assert!(!CheckoutPhase::NotFound.can_transition_to(&CheckoutPhase::Active));
        assert!(CheckoutPhase::Exited.is_terminal());
    }

    // ───────────────────────────────────────────────────────────────
    // Initialization
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn begins_in_loading_and_ignores_events() {
        let mut controller = CheckoutController::begin(course_id(), Locale::En);
        assert_eq!(controller.phase(), CheckoutPhase::Loading);
        assert!(matches!(controller.view(), CheckoutView::Loading { .. }));

        let outcome = controller.dispatch(StepEvent::GoBack);
        assert!(outcome.is_ignored());
        assert_eq!(controller.phase(), CheckoutPhase::Loading);
    }

    #[test]
    fn resolved_course_activates_first_visible_stage() {
        let mut controller = CheckoutController::begin(course_id(), Locale::En);
        let phase = controller.resolve_course(Some(self_paced_course())).unwrap();

        assert_eq!(phase, CheckoutPhase::Active);
        assert_eq!(
            controller.session().unwrap().current_stage(),
            CheckoutStage::Plan
        );
        assert_eq!(
            event_types(&mut controller),
            vec!["checkout.started.v1", "checkout.course_resolved.v1"]
        );
    }

    #[test]
    fn missing_course_is_terminal_not_found() {
        let mut controller = CheckoutController::begin(course_id(), Locale::En);
        let phase = controller.resolve_course(None).unwrap();

        assert_eq!(phase, CheckoutPhase::NotFound);
        assert!(matches!(controller.view(), CheckoutView::NotFound { .. }));

        let outcome = controller.dispatch(StepEvent::SessionSelected { session: session("s1") });
        assert!(outcome.is_ignored());
        assert_eq!(controller.phase(), CheckoutPhase::NotFound);
    }

    #[test]
    fn resolving_twice_is_rejected() {
        let mut controller = active(scheduled_course());
        let err = controller.resolve_course(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(err.details.get("current"), Some(&"active".to_string()));
        assert_eq!(controller.phase(), CheckoutPhase::Active);
    }

    // ───────────────────────────────────────────────────────────────
    // Exits
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn not_found_returns_to_catalogue() {
        let mut controller = CheckoutController::begin(course_id(), Locale::En);
        controller.resolve_course(None).unwrap();

        let outcome = controller.dispatch(StepEvent::ReturnToCatalogue);

        assert_eq!(outcome.exit_target(), Some(&NavigationTarget::Catalogue));
        assert_eq!(controller.phase(), CheckoutPhase::Exited);
        assert_eq!(
            event_types(&mut controller),
            vec![
                "checkout.started.v1",
                "checkout.course_not_found.v1",
                "checkout.exited.v1"
            ]
        );
    }

    #[test]
    fn exited_controller_ignores_everything() {
        let mut controller = active(self_paced_course());
        controller.dispatch(StepEvent::GoBack);
        assert_eq!(controller.phase(), CheckoutPhase::Exited);

        let outcome = controller.dispatch(StepEvent::PlanSelected { plan: plan("p1") });
        assert!(outcome.is_ignored());
        assert!(matches!(
            controller.exit_target(),
            Some(NavigationTarget::CourseDetail { .. })
        ));
    }

    #[test]
    fn access_course_exits_to_dashboard() {
        let mut controller = active(self_paced_course());
        controller.dispatch(StepEvent::PlanSelected { plan: plan("p1") });
        controller.dispatch(StepEvent::PaymentSucceeded { receipt: receipt("t1") });
        controller.take_events();

        controller.dispatch(StepEvent::AccessCourse);

        assert_eq!(controller.exit_target(), Some(&NavigationTarget::Dashboard));
        assert_eq!(event_types(&mut controller), vec!["checkout.exited.v1"]);
    }

    // ───────────────────────────────────────────────────────────────
    // View composition
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn active_view_composes_indicator_and_step() {
        let controller = active(self_paced_course());

        match controller.view() {
            CheckoutView::Active {
                stage,
                position,
                indicator,
                step,
                ..
            } => {
                assert_eq!(stage, CheckoutStage::Plan);
                assert_eq!(position, Some(StepPosition { current: 1, total: 3 }));
                assert_eq!(indicator.entries[0].status, StepVisualStatus::Active);
                assert_eq!(step.stage(), CheckoutStage::Plan);
            }
            other => panic!("expected active view, got {:?}", other),
        }
    }

    #[test]
    fn concrete_scenario_through_controller() {
        let mut controller = active(course("abc", CourseFormat::Scheduled));

        controller.dispatch(StepEvent::SessionSelected { session: session("s1") });
        controller.dispatch(StepEvent::PlanSelected { plan: plan("p1") });
        controller.dispatch(StepEvent::PaymentFailed {
            reason: "card_declined".to_string(),
        });
        let checkout = controller.session().unwrap();
        assert_eq!(checkout.current_stage().id(), 3);
        assert_eq!(checkout.payment_status(), PaymentStatus::Failed);

        controller.dispatch(StepEvent::PaymentSucceeded { receipt: receipt("t1") });
        let checkout = controller.session().unwrap();
        assert_eq!(checkout.current_stage().id(), 4);
        assert_eq!(checkout.payment_status(), PaymentStatus::Success);
        assert_eq!(
            checkout.payment_receipt().unwrap().transaction_id.as_str(),
            "t1"
        );
    }

    #[test]
    fn ignored_events_record_nothing() {
        let mut controller = active(scheduled_course());
        controller.take_events();

        controller.dispatch(StepEvent::PlanSelected { plan: plan("p1") });
        controller.dispatch(StepEvent::AccessCourse);

        assert!(controller.take_events().is_empty());
    }

    proptest! {
        #[test]
        fn indicator_always_shows_contiguous_numbering(self_paced in any::<bool>(), steps in 0usize..3) {
            let format = if self_paced { CourseFormat::SelfPaced } else { CourseFormat::Scheduled };
            let mut controller = active(course("c", format));
            let forward = [
                StepEvent::SessionSelected { session: session("s1") },
                StepEvent::PlanSelected { plan: plan("p1") },
                StepEvent::PaymentSucceeded { receipt: receipt("t1") },
            ];
            for event in forward.iter().take(steps + 1) {
                controller.dispatch(event.clone());
            }

            if let CheckoutView::Active { indicator, position, .. } = controller.view() {
                let ordinals: Vec<usize> = indicator.entries.iter().map(|e| e.ordinal).collect();
                let expected: Vec<usize> = (1..=indicator.total()).collect();
                prop_assert_eq!(ordinals, expected);
                prop_assert_eq!(indicator.total(), if self_paced { 3 } else { 4 });
                prop_assert!(position.is_some());
            } else {
                prop_assert!(false, "controller left the active phase");
            }
        }
    }
}
