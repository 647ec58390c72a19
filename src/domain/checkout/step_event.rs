//! StepEvent - the inputs a step view reports back to the controller.

use serde::{Deserialize, Serialize};

use super::{CheckoutStage, PaymentReceipt, PlanDescriptor, SessionDescriptor};

/// Event emitted by the active step view (or the not-found view).
///
/// Each view owns exactly one forward event plus `GoBack`; the controller
/// decides what an event means by checking it against the current stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepEvent {
    SessionSelected { session: SessionDescriptor },
    PlanSelected { plan: PlanDescriptor },
    /// Learner resubmits after a failed payment.
    PaymentAttempted,
    PaymentSucceeded { receipt: PaymentReceipt },
    PaymentFailed { reason: String },
    GoBack,
    AccessCourse,
    /// Only affordance of the not-found view.
    ReturnToCatalogue,
}

impl StepEvent {
    /// Short name used in logs and ignore reasons.
    pub fn name(&self) -> &'static str {
        match self {
            StepEvent::SessionSelected { .. } => "session_selected",
            StepEvent::PlanSelected { .. } => "plan_selected",
            StepEvent::PaymentAttempted => "payment_attempted",
            StepEvent::PaymentSucceeded { .. } => "payment_succeeded",
            StepEvent::PaymentFailed { .. } => "payment_failed",
            StepEvent::GoBack => "go_back",
            StepEvent::AccessCourse => "access_course",
            StepEvent::ReturnToCatalogue => "return_to_catalogue",
        }
    }

    /// Stage the event is guarded on. `GoBack` works from any stage and
    /// `ReturnToCatalogue` from none.
    pub fn guard_stage(&self) -> Option<CheckoutStage> {
        match self {
            StepEvent::SessionSelected { .. } => Some(CheckoutStage::Session),
            StepEvent::PlanSelected { .. } => Some(CheckoutStage::Plan),
            StepEvent::PaymentAttempted
            | StepEvent::PaymentSucceeded { .. }
            | StepEvent::PaymentFailed { .. } => Some(CheckoutStage::Payment),
            StepEvent::AccessCourse => Some(CheckoutStage::Confirmation),
            StepEvent::GoBack | StepEvent::ReturnToCatalogue => None,
        }
    }
}
