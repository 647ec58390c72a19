//! Checkout handlers.
//!
//! ## Commands
//! - Starting a checkout (the one course lookup)
//! - Dispatching a step event against a live checkout
//!
//! ## Queries
//! - Rendering the current checkout view

mod dispatch_step_event;
mod get_checkout_view;
mod start_checkout;

pub use dispatch_step_event::{
    DispatchStepEventCommand, DispatchStepEventHandler, DispatchStepEventResult,
};
pub use get_checkout_view::{GetCheckoutViewHandler, GetCheckoutViewQuery};
pub use start_checkout::{StartCheckoutCommand, StartCheckoutHandler, StartCheckoutResult};

use crate::domain::checkout::CheckoutController;
use crate::domain::foundation::{DomainError, EventEnvelope, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Drains the controller's pending events and publishes them in order.
async fn publish_pending_events(
    publisher: &dyn EventPublisher,
    checkout: &mut CheckoutController,
) -> Result<(), DomainError> {
    let envelopes = checkout
        .take_events()
        .iter()
        .map(|event| event.to_envelope())
        .collect::<Result<Vec<EventEnvelope>, DomainError>>()?;
    if envelopes.is_empty() {
        return Ok(());
    }
    publisher.publish_all(envelopes).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::adapters::catalogue::InMemoryCourseCatalogue;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryCheckoutRepository;
    use crate::domain::checkout::{CourseDescriptor, CourseFormat};
    use crate::domain::foundation::CourseId;

    pub struct Fixture {
        pub catalogue: Arc<InMemoryCourseCatalogue>,
        pub repository: Arc<InMemoryCheckoutRepository>,
        pub bus: Arc<InMemoryEventBus>,
    }

    pub fn course(id: &str, format: CourseFormat) -> CourseDescriptor {
        CourseDescriptor {
            id: CourseId::new(id).unwrap(),
            slug: format!("{}-slug", id),
            title: format!("Course {}", id),
            format,
            pricing_options: Vec::new(),
        }
    }

    pub fn fixture() -> Fixture {
        Fixture {
            catalogue: Arc::new(InMemoryCourseCatalogue::with_courses([
                course("abc", CourseFormat::Scheduled),
                course("paced", CourseFormat::SelfPaced),
            ])),
            repository: Arc::new(InMemoryCheckoutRepository::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }
}
