//! Checkout event logger - writes every checkout event to the tracing log.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::checkout::CheckoutEvent;
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Event handler emitting one structured log line per checkout event.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutEventLogger;

#[async_trait]
impl EventHandler for CheckoutEventLogger {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.payload_as::<CheckoutEvent>() {
            Ok(CheckoutEvent::PaymentFailed { reason, .. }) => {
                warn!(
                    event_type = %event.event_type,
                    checkout_id = %event.aggregate_id,
                    %reason,
                    "Checkout payment failed"
                );
            }
            Ok(_) => {
                info!(
                    event_type = %event.event_type,
                    checkout_id = %event.aggregate_id,
                    event_id = %event.event_id,
                    "Checkout event"
                );
            }
            Err(e) => {
                warn!(
                    event_type = %event.event_type,
                    error = %e,
                    "Unreadable checkout event payload"
                );
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CheckoutEventLogger"
    }
}
