//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and event plumbing
//! that form the vocabulary of the checkout domain.

mod errors;
mod events;
mod ids;
mod locale;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, SerializableDomainEvent};
pub use ids::{CheckoutId, CohortSessionId, CourseId, PlanId, TransactionId};
pub use locale::Locale;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
