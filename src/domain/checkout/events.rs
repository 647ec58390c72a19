//! Checkout domain events.
//!
//! Emitted for every effective transition of a checkout. Ignored step events
//! never produce a domain event.

use serde::{Deserialize, Serialize};

use super::{CheckoutStage, CourseFormat, NavigationTarget};
use crate::domain::foundation::{
    CheckoutId, CohortSessionId, CourseId, DomainEvent, EventId, Locale, PlanId, Timestamp,
    TransactionId,
};

/// Events that occur during a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CheckoutEvent {
    /// Checkout mounted; the course lookup is in flight.
    Started {
        event_id: EventId,
        checkout_id: CheckoutId,
        course_id: CourseId,
        locale: Locale,
        occurred_at: Timestamp,
    },

    /// Course lookup succeeded.
    CourseResolved {
        event_id: EventId,
        checkout_id: CheckoutId,
        course_id: CourseId,
        format: CourseFormat,
        initial_stage: CheckoutStage,
        occurred_at: Timestamp,
    },

    /// Course lookup failed or found nothing. Terminal for the checkout.
    CourseNotFound {
        event_id: EventId,
        checkout_id: CheckoutId,
        course_id: CourseId,
        occurred_at: Timestamp,
    },

    SessionSelected {
        event_id: EventId,
        checkout_id: CheckoutId,
        session_id: CohortSessionId,
        occurred_at: Timestamp,
    },

    PlanSelected {
        event_id: EventId,
        checkout_id: CheckoutId,
        plan_id: PlanId,
        occurred_at: Timestamp,
    },

    PaymentSucceeded {
        event_id: EventId,
        checkout_id: CheckoutId,
        transaction_id: TransactionId,
        amount_cents: i64,
        currency: String,
        occurred_at: Timestamp,
    },

    PaymentFailed {
        event_id: EventId,
        checkout_id: CheckoutId,
        reason: String,
        occurred_at: Timestamp,
    },

    /// A failed payment was cleared for another attempt.
    PaymentRetried {
        event_id: EventId,
        checkout_id: CheckoutId,
        occurred_at: Timestamp,
    },

    SteppedBack {
        event_id: EventId,
        checkout_id: CheckoutId,
        from: CheckoutStage,
        to: CheckoutStage,
        occurred_at: Timestamp,
    },

    /// The learner left the flow.
    Exited {
        event_id: EventId,
        checkout_id: CheckoutId,
        target: NavigationTarget,
        occurred_at: Timestamp,
    },
}

impl CheckoutEvent {
    /// Every event type a checkout can emit.
    pub const EVENT_TYPES: [&'static str; 10] = [
        "checkout.started.v1",
        "checkout.course_resolved.v1",
        "checkout.course_not_found.v1",
        "checkout.session_selected.v1",
        "checkout.plan_selected.v1",
        "checkout.payment_succeeded.v1",
        "checkout.payment_failed.v1",
        "checkout.payment_retried.v1",
        "checkout.stepped_back.v1",
        "checkout.exited.v1",
    ];

    /// Returns the checkout this event belongs to.
    pub fn checkout_id(&self) -> CheckoutId {
        match self {
            CheckoutEvent::Started { checkout_id, .. }
            | CheckoutEvent::CourseResolved { checkout_id, .. }
            | CheckoutEvent::CourseNotFound { checkout_id, .. }
            | CheckoutEvent::SessionSelected { checkout_id, .. }
            | CheckoutEvent::PlanSelected { checkout_id, .. }
            | CheckoutEvent::PaymentSucceeded { checkout_id, .. }
            | CheckoutEvent::PaymentFailed { checkout_id, .. }
            | CheckoutEvent::PaymentRetried { checkout_id, .. }
            | CheckoutEvent::SteppedBack { checkout_id, .. }
            | CheckoutEvent::Exited { checkout_id, .. } => *checkout_id,
        }
    }
}

impl DomainEvent for CheckoutEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CheckoutEvent::Started { .. } => "checkout.started.v1",
            CheckoutEvent::CourseResolved { .. } => "checkout.course_resolved.v1",
            CheckoutEvent::CourseNotFound { .. } => "checkout.course_not_found.v1",
            CheckoutEvent::SessionSelected { .. } => "checkout.session_selected.v1",
            CheckoutEvent::PlanSelected { .. } => "checkout.plan_selected.v1",
            CheckoutEvent::PaymentSucceeded { .. } => "checkout.payment_succeeded.v1",
            CheckoutEvent::PaymentFailed { .. } => "checkout.payment_failed.v1",
            CheckoutEvent::PaymentRetried { .. } => "checkout.payment_retried.v1",
            CheckoutEvent::SteppedBack { .. } => "checkout.stepped_back.v1",
            CheckoutEvent::Exited { .. } => "checkout.exited.v1",
        }
    }

    fn aggregate_id(&self) -> String {
        self.checkout_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Checkout"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            CheckoutEvent::Started { occurred_at, .. }
            | CheckoutEvent::CourseResolved { occurred_at, .. }
            | CheckoutEvent::CourseNotFound { occurred_at, .. }
            | CheckoutEvent::SessionSelected { occurred_at, .. }
            | CheckoutEvent::PlanSelected { occurred_at, .. }
            | CheckoutEvent::PaymentSucceeded { occurred_at, .. }
            | CheckoutEvent::PaymentFailed { occurred_at, .. }
            | CheckoutEvent::PaymentRetried { occurred_at, .. }
            | CheckoutEvent::SteppedBack { occurred_at, .. }
            | CheckoutEvent::Exited { occurred_at, .. } => *occurred_at,
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            CheckoutEvent::Started { event_id, .. }
            | CheckoutEvent::CourseResolved { event_id, .. }
            | CheckoutEvent::CourseNotFound { event_id, .. }
            | CheckoutEvent::SessionSelected { event_id, .. }
            | CheckoutEvent::PlanSelected { event_id, .. }
            | CheckoutEvent::PaymentSucceeded { event_id, .. }
            | CheckoutEvent::PaymentFailed { event_id, .. }
            | CheckoutEvent::PaymentRetried { event_id, .. }
            | CheckoutEvent::SteppedBack { event_id, .. }
            | CheckoutEvent::Exited { event_id, .. } => *event_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    fn failed_event() -> CheckoutEvent {
        CheckoutEvent::PaymentFailed {
            event_id: EventId::new(),
            checkout_id: CheckoutId::new(),
            reason: "card_declined".to_string(),
            occurred_at: Timestamp::now(),
        }
    }

    #[test]
    fn event_types_are_versioned() {
        let event = failed_event();
        assert_eq!(event.event_type(), "checkout.payment_failed.v1");
        assert_eq!(event.aggregate_type(), "Checkout");
    }

    #[test]
    fn event_types_list_covers_emitted_type() {
        assert!(CheckoutEvent::EVENT_TYPES.contains(&failed_event().event_type()));
    }

    #[test]
    fn envelope_uses_checkout_id_as_aggregate() {
        let event = failed_event();
        let envelope = event.to_envelope().unwrap();
        assert_eq!(envelope.aggregate_id, event.checkout_id().to_string());
        assert_eq!(envelope.schema_version, 1);
        assert_eq!(envelope.payload["event"], "payment_failed");
        assert_eq!(envelope.payload["reason"], "card_declined");
    }

    #[test]
    fn envelope_payload_round_trips() {
        let event = failed_event();
        let envelope = event.to_envelope().unwrap();
        let restored: CheckoutEvent = envelope.payload_as().unwrap();
        assert_eq!(restored, event);
    }
}
