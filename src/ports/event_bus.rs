//! Event ports - how checkout events leave the application layer.
//!
//! Handlers publish the envelopes a checkout accumulated after it has been
//! saved. Subscribers register by event type (`checkout.*.v1`).

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing checkout events.
///
/// Envelopes of one checkout must reach subscribers in the order given to
/// `publish_all`. A failing subscriber surfaces as an error to the caller.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publishes a batch in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

/// Reacts to published events, e.g. the checkout event logger.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Used in error messages when a handler fails.
    fn name(&self) -> &'static str;
}

/// Registers handlers by event type.
///
/// ```ignore
/// bus.subscribe_all(&CheckoutEvent::EVENT_TYPES, Arc::new(CheckoutEventLogger));
/// ```
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        for event_type in event_types {
            self.subscribe(event_type, handler.clone());
        }
    }
}
