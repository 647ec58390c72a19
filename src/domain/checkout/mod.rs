//! Checkout module - the enrollment checkout state machine.
//!
//! # Components
//!
//! - [`CheckoutStage`] / [`StepList`] - the four stages and their skip annotation
//! - [`StepIndicator`] - pure projection of the position for display
//! - [`CheckoutSession`] - aggregate holding the transition table
//! - [`StepView`] - read-only slice handed to the active stage
//! - [`CheckoutController`] - loading / active / not-found / exited lifecycle
//!
//! Step views report back with a [`StepEvent`]; the controller is the only
//! place an event is turned into a state change.

mod aggregate;
mod controller;
mod descriptors;
mod errors;
mod events;
mod indicator;
mod navigation;
mod payment_status;
mod stage;
mod step;
mod step_event;
mod views;

pub use aggregate::{CheckoutSession, TransitionOutcome};
pub use controller::{CheckoutController, CheckoutPhase, CheckoutView, StepPosition};
pub use descriptors::{
    CourseDescriptor, CourseFormat, Installment, PaymentReceipt, PlanDescriptor,
    SessionDescriptor,
};
pub use errors::CheckoutError;
pub use events::CheckoutEvent;
pub use indicator::{IndicatorEntry, StepIndicator, StepVisualStatus};
pub use navigation::{NavigationPaths, NavigationTarget};
pub use payment_status::PaymentStatus;
pub use stage::CheckoutStage;
pub use step::{Step, StepList};
pub use step_event::StepEvent;
pub use views::StepView;
