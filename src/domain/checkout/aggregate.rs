//! CheckoutSession aggregate - the state of one enrollment checkout.
//!
//! Owns the transition table. Every mutation goes through [`CheckoutSession::apply`];
//! step views only ever see read-only slices.
//!
//! # Transition table
//!
//! | Stage        | Event              | Effect                                           |
//! |--------------|--------------------|--------------------------------------------------|
//! | Session      | session_selected   | store session, go to Plan                        |
//! | Plan         | plan_selected      | store plan, reset payment, go to Payment         |
//! | Payment      | payment_succeeded  | status success, store receipt, go to Confirmation |
//! | Payment      | payment_failed     | status failed, stay on Payment                   |
//! | Payment      | payment_attempted  | failed → pending, stay on Payment                |
//! | Confirmation | access_course      | exit to dashboard                                |
//! | any          | go_back            | previous visible stage, or exit to course detail |
//!
//! Events that do not match the current stage are ignored without effect.

use serde::Serialize;

use super::{
    CheckoutEvent, CheckoutStage, CourseDescriptor, NavigationTarget, PaymentReceipt,
    PaymentStatus, PlanDescriptor, SessionDescriptor, StepEvent, StepList,
};
use crate::domain::foundation::{CheckoutId, CourseId, EventId, Locale, Timestamp};

/// What applying a step event did to the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Advanced {
        from: CheckoutStage,
        to: CheckoutStage,
    },
    SteppedBack {
        from: CheckoutStage,
        to: CheckoutStage,
    },
    /// Payment stage kept; the failure is surfaced in place.
    PaymentFailed { reason: String },
    /// Failure cleared, payment can be resubmitted.
    PaymentRetryReady,
    Exited { target: NavigationTarget },
    Ignored {
        event: &'static str,
        reason: String,
    },
}

impl TransitionOutcome {
    fn ignored(event: &StepEvent, reason: impl Into<String>) -> Self {
        TransitionOutcome::Ignored {
            event: event.name(),
            reason: reason.into(),
        }
    }

    /// Returns true if the event changed nothing.
    pub fn is_ignored(&self) -> bool {
        matches!(self, TransitionOutcome::Ignored { .. })
    }

    /// Returns the exit target if the flow was left.
    pub fn exit_target(&self) -> Option<&NavigationTarget> {
        match self {
            TransitionOutcome::Exited { target } => Some(target),
            _ => None,
        }
    }
}

/// Checkout aggregate.
///
/// # Invariants
///
/// - `current_stage` is never a skipped stage
/// - `skip_session_step` is fixed at creation
/// - `selected_session` is only set when the Session stage is visible
/// - `payment_receipt.is_some() == (payment_status == Success)`
/// - Confirmation is only reached through a successful payment
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: CheckoutId,
    course_id: CourseId,
    course: CourseDescriptor,
    locale: Locale,
    skip_session_step: bool,
    steps: StepList,
    current_stage: CheckoutStage,
    selected_session: Option<SessionDescriptor>,
    selected_plan: Option<PlanDescriptor>,
    payment_status: PaymentStatus,
    payment_receipt: Option<PaymentReceipt>,
    last_failure_reason: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
    domain_events: Vec<CheckoutEvent>,
}

impl CheckoutSession {
    /// Starts a checkout for a resolved course, on its first visible stage.
    pub fn start(
        id: CheckoutId,
        course_id: CourseId,
        course: CourseDescriptor,
        locale: Locale,
    ) -> Self {
        let skip_session_step = !course.format.requires_session_selection();
        let steps = StepList::new(skip_session_step, locale);
        let current_stage = steps.first_active();
        let now = Timestamp::now();

        let mut session = Self {
            id,
            course_id: course_id.clone(),
            course,
            locale,
            skip_session_step,
            steps,
            current_stage,
            selected_session: None,
            selected_plan: None,
            payment_status: PaymentStatus::Pending,
            payment_receipt: None,
            last_failure_reason: None,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };

        let format = session.course.format;
        session.record_event(CheckoutEvent::CourseResolved {
            event_id: EventId::new(),
            checkout_id: id,
            course_id,
            format,
            initial_stage: current_stage,
            occurred_at: now,
        });

        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> CheckoutId {
        self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn course(&self) -> &CourseDescriptor {
        &self.course
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn skip_session_step(&self) -> bool {
        self.skip_session_step
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn current_stage(&self) -> CheckoutStage {
        self.current_stage
    }

    pub fn selected_session(&self) -> Option<&SessionDescriptor> {
        self.selected_session.as_ref()
    }

    pub fn selected_plan(&self) -> Option<&PlanDescriptor> {
        self.selected_plan.as_ref()
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn payment_receipt(&self) -> Option<&PaymentReceipt> {
        self.payment_receipt.as_ref()
    }

    /// Reason of the last failed payment while it is still shown.
    pub fn last_failure_reason(&self) -> Option<&str> {
        self.last_failure_reason.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CheckoutEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a step event against the current stage.
    ///
    /// Guards are checked at the moment of application, so a stale view
    /// firing after the stage moved on is ignored.
    pub fn apply(&mut self, event: StepEvent) -> TransitionOutcome {
        let stage = self.current_stage;

        if let Some(guard) = event.guard_stage() {
            if guard != stage {
                return TransitionOutcome::ignored(
                    &event,
                    format!("expected stage {}, checkout is at {}", guard, stage),
                );
            }
        }

        match event {
            StepEvent::SessionSelected { session } => {
                let session_id = session.id.clone();
                self.selected_session = Some(session);
                self.record_event(CheckoutEvent::SessionSelected {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    session_id,
                    occurred_at: Timestamp::now(),
                });
                self.advance_to(CheckoutStage::Plan)
            }

            StepEvent::PlanSelected { plan } => {
                let plan_id = plan.id.clone();
                self.selected_plan = Some(plan);
                // Entering Payment forward always starts a fresh attempt.
                self.payment_status = PaymentStatus::Pending;
                self.payment_receipt = None;
                self.last_failure_reason = None;
                self.record_event(CheckoutEvent::PlanSelected {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    plan_id,
                    occurred_at: Timestamp::now(),
                });
                self.advance_to(CheckoutStage::Payment)
            }

            StepEvent::PaymentAttempted => {
                if !self.payment_status.is_failed() {
                    return TransitionOutcome::ignored(
                        &StepEvent::PaymentAttempted,
                        format!("payment is {}, nothing to retry", self.payment_status),
                    );
                }
                self.payment_status = PaymentStatus::Pending;
                self.last_failure_reason = None;
                self.touch();
                self.record_event(CheckoutEvent::PaymentRetried {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    occurred_at: Timestamp::now(),
                });
                TransitionOutcome::PaymentRetryReady
            }

            StepEvent::PaymentSucceeded { receipt } => {
                self.record_event(CheckoutEvent::PaymentSucceeded {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    transaction_id: receipt.transaction_id.clone(),
                    amount_cents: receipt.amount_cents,
                    currency: receipt.currency.clone(),
                    occurred_at: Timestamp::now(),
                });
                self.payment_status = PaymentStatus::Success;
                self.payment_receipt = Some(receipt);
                self.last_failure_reason = None;
                self.advance_to(CheckoutStage::Confirmation)
            }

            StepEvent::PaymentFailed { reason } => {
                self.payment_status = PaymentStatus::Failed;
                self.payment_receipt = None;
                self.last_failure_reason = Some(reason.clone());
                self.touch();
                self.record_event(CheckoutEvent::PaymentFailed {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    reason: reason.clone(),
                    occurred_at: Timestamp::now(),
                });
                TransitionOutcome::PaymentFailed { reason }
            }

            StepEvent::AccessCourse => TransitionOutcome::Exited {
                target: NavigationTarget::Dashboard,
            },

            StepEvent::GoBack => self.go_back(),

            event @ StepEvent::ReturnToCatalogue => {
                TransitionOutcome::ignored(&event, "course was resolved, catalogue exit is not offered")
            }
        }
    }

    fn go_back(&mut self) -> TransitionOutcome {
        let from = self.current_stage;
        match self.steps.previous_visible(from) {
            Some(to) => {
                if from == CheckoutStage::Payment && self.payment_status.is_failed() {
                    self.payment_status = PaymentStatus::Pending;
                    self.last_failure_reason = None;
                }
                self.current_stage = to;
                self.touch();
                self.record_event(CheckoutEvent::SteppedBack {
                    event_id: EventId::new(),
                    checkout_id: self.id,
                    from,
                    to,
                    occurred_at: Timestamp::now(),
                });
                TransitionOutcome::SteppedBack { from, to }
            }
            None => TransitionOutcome::Exited {
                target: NavigationTarget::CourseDetail {
                    course_id: self.course_id.clone(),
                    slug: self.course.slug.clone(),
                },
            },
        }
    }

    fn advance_to(&mut self, to: CheckoutStage) -> TransitionOutcome {
        let from = self.current_stage;
        self.current_stage = to;
        self.touch();
        TransitionOutcome::Advanced { from, to }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn record_event(&mut self, event: CheckoutEvent) {
        self.domain_events.push(event);
    }
}
