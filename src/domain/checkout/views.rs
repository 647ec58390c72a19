//! Step view contracts - the read-only slice each stage renders from.
//!
//! A view never holds a reference into the aggregate. It receives cloned
//! data and reports back through exactly one forward [`StepEvent`] plus
//! `GoBack`.

use serde::Serialize;

use super::{
    CheckoutSession, CheckoutStage, CourseDescriptor, PaymentReceipt, PaymentStatus,
    PlanDescriptor, SessionDescriptor, StepEvent,
};

/// Data handed to the active step view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StepView {
    /// Learner picks a cohort session from externally supplied options.
    Session {
        course: CourseDescriptor,
        selected_session: Option<SessionDescriptor>,
    },
    Plan {
        course: CourseDescriptor,
        selected_session: Option<SessionDescriptor>,
        selected_plan: Option<PlanDescriptor>,
    },
    Payment {
        course: CourseDescriptor,
        selected_session: Option<SessionDescriptor>,
        selected_plan: Option<PlanDescriptor>,
        payment_status: PaymentStatus,
        /// Set while a failed attempt is shown inline.
        failure_reason: Option<String>,
    },
    Confirmation {
        course: CourseDescriptor,
        selected_session: Option<SessionDescriptor>,
        selected_plan: Option<PlanDescriptor>,
        receipt: Option<PaymentReceipt>,
    },
}

impl StepView {
    /// Builds the slice for the checkout's current stage.
    pub fn for_session(checkout: &CheckoutSession) -> Self {
        let course = checkout.course().clone();
        let selected_session = checkout.selected_session().cloned();

        match checkout.current_stage() {
            CheckoutStage::Session => StepView::Session {
                course,
                selected_session,
            },
            CheckoutStage::Plan => StepView::Plan {
                course,
                selected_session,
                selected_plan: checkout.selected_plan().cloned(),
            },
            CheckoutStage::Payment => StepView::Payment {
                course,
                selected_session,
                selected_plan: checkout.selected_plan().cloned(),
                payment_status: checkout.payment_status(),
                failure_reason: checkout.last_failure_reason().map(str::to_string),
            },
            CheckoutStage::Confirmation => StepView::Confirmation {
                course,
                selected_session,
                selected_plan: checkout.selected_plan().cloned(),
                receipt: checkout.payment_receipt().cloned(),
            },
        }
    }

    pub fn stage(&self) -> CheckoutStage {
        match self {
            StepView::Session { .. } => CheckoutStage::Session,
            StepView::Plan { .. } => CheckoutStage::Plan,
            StepView::Payment { .. } => CheckoutStage::Payment,
            StepView::Confirmation { .. } => CheckoutStage::Confirmation,
        }
    }

    /// Event names this view may emit.
    pub fn accepted_events(&self) -> &'static [&'static str] {
        match self {
            StepView::Session { .. } => &["session_selected", "go_back"],
            StepView::Plan { .. } => &["plan_selected", "go_back"],
            StepView::Payment {
                payment_status: PaymentStatus::Failed,
                ..
            } => &["payment_attempted", "payment_succeeded", "payment_failed", "go_back"],
            StepView::Payment { .. } => &["payment_succeeded", "payment_failed", "go_back"],
            StepView::Confirmation { .. } => &["access_course", "go_back"],
        }
    }

    /// Returns true if the view offers the given event.
    pub fn accepts(&self, event: &StepEvent) -> bool {
        self.accepted_events().contains(&event.name())
    }
}
