//! StartCheckoutHandler - mounts a checkout and resolves its course.

use std::sync::Arc;

use tracing::{info, warn};

use super::publish_pending_events;
use crate::domain::checkout::{CheckoutController, CheckoutError, CheckoutPhase, CheckoutView};
use crate::domain::foundation::{CheckoutId, CourseId, Locale};
use crate::ports::{CheckoutRepository, CourseLookup, EventPublisher};

/// Command to start a checkout for a course.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub course_id: CourseId,
    pub locale: Locale,
}

/// Result of starting a checkout.
#[derive(Debug, Clone)]
pub struct StartCheckoutResult {
    pub checkout_id: CheckoutId,
    pub phase: CheckoutPhase,
    pub view: CheckoutView,
}

/// Handler for starting checkouts.
///
/// The checkout is stored in Loading before the lookup is awaited, so it is
/// addressable while the catalogue answers. A lookup error is folded into
/// the not-found outcome.
pub struct StartCheckoutHandler {
    repository: Arc<dyn CheckoutRepository>,
    course_lookup: Arc<dyn CourseLookup>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl StartCheckoutHandler {
    pub fn new(
        repository: Arc<dyn CheckoutRepository>,
        course_lookup: Arc<dyn CourseLookup>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            course_lookup,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: StartCheckoutCommand) -> Result<StartCheckoutResult, CheckoutError> {
        let mut checkout = CheckoutController::begin(cmd.course_id.clone(), cmd.locale);
        let checkout_id = checkout.id();
        info!(%checkout_id, course_id = %cmd.course_id, locale = %cmd.locale, "Checkout started, looking up course");

        self.repository.save(&checkout).await?;

        let course = match self.course_lookup.fetch(&cmd.course_id).await {
            Ok(Some(course)) => Some(course),
            Ok(None) => {
                warn!(%checkout_id, course_id = %cmd.course_id, "Course not found");
                None
            }
            Err(e) => {
                warn!(%checkout_id, course_id = %cmd.course_id, error = %e, "Course lookup failed");
                None
            }
        };

        let phase = checkout.resolve_course(course)?;
        if let Some(session) = checkout.session() {
            info!(
                %checkout_id,
                course_id = %cmd.course_id,
                stage = %session.current_stage(),
                skip_session_step = session.skip_session_step(),
                "Course resolved"
            );
        }

        self.repository.save(&checkout).await?;
        publish_pending_events(self.event_publisher.as_ref(), &mut checkout).await?;

        Ok(StartCheckoutResult {
            checkout_id,
            phase,
            view: checkout.view(),
        })
    }
}
