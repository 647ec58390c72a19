//! DispatchStepEventHandler - applies a step event to a live checkout.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::publish_pending_events;
use crate::domain::checkout::{
    CheckoutError, CheckoutPhase, CheckoutView, NavigationPaths, StepEvent, TransitionOutcome,
};
use crate::domain::foundation::CheckoutId;
use crate::ports::{CheckoutRepository, EventPublisher};

/// Command carrying one step event for a checkout.
#[derive(Debug, Clone)]
pub struct DispatchStepEventCommand {
    pub checkout_id: CheckoutId,
    pub event: StepEvent,
}

/// Result of dispatching a step event.
#[derive(Debug, Clone)]
pub struct DispatchStepEventResult {
    pub outcome: TransitionOutcome,
    pub view: CheckoutView,
    /// Locale-prefixed path to navigate to, set when the flow was left.
    pub redirect_to: Option<String>,
}

/// Handler for step events.
///
/// Transitions on one checkout are applied one at a time: the
/// load-apply-save cycle runs under that checkout's lock, so a double
/// submission sees the state left by the first. Different checkouts do not
/// wait on each other. Exited checkouts are discarded.
pub struct DispatchStepEventHandler {
    repository: Arc<dyn CheckoutRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    paths: NavigationPaths,
    transitions: TransitionLocks,
}

/// One async lock per checkout with a dispatch in flight.
///
/// An entry lives while some dispatch holds or waits on it. New handles are
/// only cloned under the map lock, so a strong count of one there means no
/// dispatch references the entry.
#[derive(Default)]
struct TransitionLocks {
    locks: std::sync::Mutex<HashMap<CheckoutId, Arc<Mutex<()>>>>,
}

impl TransitionLocks {
    async fn acquire(&self, checkout_id: CheckoutId) -> TransitionGuard<'_> {
        let lock = Arc::clone(
            self.locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(checkout_id)
                .or_default(),
        );
        TransitionGuard {
            locks: self,
            checkout_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn in_flight(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

struct TransitionGuard<'a> {
    locks: &'a TransitionLocks,
    checkout_id: CheckoutId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        if locks
            .get(&self.checkout_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.checkout_id);
        }
    }
}

impl DispatchStepEventHandler {
    pub fn new(
        repository: Arc<dyn CheckoutRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        paths: NavigationPaths,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            paths,
            transitions: TransitionLocks::default(),
        }
    }

    pub async fn handle(
        &self,
        cmd: DispatchStepEventCommand,
    ) -> Result<DispatchStepEventResult, CheckoutError> {
        let _transition = self.transitions.acquire(cmd.checkout_id).await;

        let mut checkout = self
            .repository
            .find_by_id(&cmd.checkout_id)
            .await?
            .ok_or(CheckoutError::NotFound(cmd.checkout_id))?;

        let checkout_id = checkout.id();
        let event_name = cmd.event.name();
        let outcome = checkout.dispatch(cmd.event);

        match &outcome {
            TransitionOutcome::Ignored { reason, .. } => {
                debug!(%checkout_id, event = event_name, %reason, "Step event ignored");
            }
            TransitionOutcome::Advanced { from, to } | TransitionOutcome::SteppedBack { from, to } => {
                info!(%checkout_id, event = event_name, %from, %to, "Checkout stage changed");
            }
            TransitionOutcome::PaymentFailed { reason } => {
                info!(%checkout_id, %reason, "Payment failed, retry offered in place");
            }
            TransitionOutcome::PaymentRetryReady => {
                info!(%checkout_id, "Payment failure cleared for retry");
            }
            TransitionOutcome::Exited { target } => {
                info!(%checkout_id, event = event_name, target = ?target, "Checkout exited");
            }
        }

        let redirect_to = outcome
            .exit_target()
            .map(|target| self.paths.render(target, checkout.locale()));

        if checkout.phase() == CheckoutPhase::Exited {
            self.repository.delete(&checkout_id).await?;
        } else if !outcome.is_ignored() {
            self.repository.save(&checkout).await?;
        }
        publish_pending_events(self.event_publisher.as_ref(), &mut checkout).await?;

        Ok(DispatchStepEventResult {
            outcome,
            view: checkout.view(),
            redirect_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryCheckoutRepository;
    use crate::application::handlers::checkout::test_support::{fixture, Fixture};
    use crate::application::handlers::checkout::{StartCheckoutCommand, StartCheckoutHandler};
    use crate::domain::checkout::{
        CheckoutController, CheckoutStage, PaymentReceipt, PlanDescriptor, SessionDescriptor,
    };
    use crate::domain::foundation::{
        CohortSessionId, CourseId, DomainError, Locale, PlanId, TransactionId,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;

    async fn start(f: &Fixture, course_id: &str, locale: Locale) -> CheckoutId {
        StartCheckoutHandler::new(f.repository.clone(), f.catalogue.clone(), f.bus.clone())
            .handle(StartCheckoutCommand {
                course_id: CourseId::new(course_id).unwrap(),
                locale,
            })
            .await
            .unwrap()
            .checkout_id
    }

    fn handler(f: &Fixture) -> DispatchStepEventHandler {
        DispatchStepEventHandler::new(f.repository.clone(), f.bus.clone(), NavigationPaths::default())
    }

    fn command(checkout_id: CheckoutId, event: StepEvent) -> DispatchStepEventCommand {
        DispatchStepEventCommand { checkout_id, event }
    }

    fn session_selected() -> StepEvent {
        StepEvent::SessionSelected {
            session: SessionDescriptor {
                id: CohortSessionId::new("s1").unwrap(),
                start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                label: None,
            },
        }
    }

    fn plan_selected() -> StepEvent {
        StepEvent::PlanSelected {
            plan: PlanDescriptor {
                id: PlanId::new("p1").unwrap(),
                label: String::new(),
                price_schedule: Vec::new(),
            },
        }
    }

    fn payment_succeeded() -> StepEvent {
        StepEvent::PaymentSucceeded {
            receipt: PaymentReceipt::new(TransactionId::new("t1").unwrap(), 1000, "USD", "card"),
        }
    }

    #[tokio::test]
    async fn forward_event_advances_and_persists() {
        let f = fixture();
        let id = start(&f, "abc", Locale::En).await;

        let result = handler(&f).handle(command(id, session_selected())).await.unwrap();

        assert_eq!(
            result.outcome,
            TransitionOutcome::Advanced {
                from: CheckoutStage::Session,
                to: CheckoutStage::Plan
            }
        );
        assert!(result.redirect_to.is_none());
        let stored = f.repository.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.session().unwrap().current_stage(), CheckoutStage::Plan);
        assert!(f.bus.has_event("checkout.session_selected.v1"));
    }

    #[tokio::test]
    async fn ignored_event_publishes_nothing() {
        let f = fixture();
        let id = start(&f, "abc", Locale::En).await;
        f.bus.clear();

        let result = handler(&f).handle(command(id, plan_selected())).await.unwrap();

        assert!(result.outcome.is_ignored());
        assert!(f.bus.is_empty());
    }

    #[tokio::test]
    async fn back_out_of_self_paced_plan_redirects_to_course_page() {
        let f = fixture();
        let id = start(&f, "paced", Locale::Es).await;

        let result = handler(&f).handle(command(id, StepEvent::GoBack)).await.unwrap();

        assert_eq!(result.redirect_to.as_deref(), Some("/es/courses/paced-slug"));
        assert!(f.repository.find_by_id(&id).await.unwrap().is_none());
        assert!(f.bus.has_event("checkout.exited.v1"));
    }

    #[tokio::test]
    async fn access_course_redirects_to_dashboard() {
        let f = fixture();
        let id = start(&f, "abc", Locale::En).await;
        let handler = handler(&f);

        for event in [session_selected(), plan_selected(), payment_succeeded()] {
            handler.handle(command(id, event)).await.unwrap();
        }
        let result = handler.handle(command(id, StepEvent::AccessCourse)).await.unwrap();

        assert_eq!(result.redirect_to.as_deref(), Some("/en/dashboard"));
        assert!(matches!(result.view, CheckoutView::Exited { .. }));
    }

    #[tokio::test]
    async fn not_found_checkout_returns_to_catalogue() {
        let f = fixture();
        let id = start(&f, "missing", Locale::En).await;

        let result = handler(&f)
            .handle(command(id, StepEvent::ReturnToCatalogue))
            .await
            .unwrap();

        assert_eq!(result.redirect_to.as_deref(), Some("/en/courses"));
    }

    #[tokio::test]
    async fn unknown_checkout_is_an_error() {
        let f = fixture();
        let id = CheckoutId::new();

        let err = handler(&f)
            .handle(command(id, StepEvent::GoBack))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::NotFound(id));
    }

    #[tokio::test]
    async fn exited_checkout_is_gone_for_later_events() {
        let f = fixture();
        let id = start(&f, "paced", Locale::En).await;
        let handler = handler(&f);
        handler.handle(command(id, StepEvent::GoBack)).await.unwrap();

        let err = handler.handle(command(id, plan_selected())).await.unwrap_err();

        assert!(matches!(err, CheckoutError::NotFound(_)));
    }

    /// Yields after every load so concurrent dispatches interleave between
    /// load and save.
    struct YieldingRepository(Arc<InMemoryCheckoutRepository>);

    #[async_trait]
    impl CheckoutRepository for YieldingRepository {
        async fn save(&self, checkout: &CheckoutController) -> Result<(), DomainError> {
            self.0.save(checkout).await
        }

        async fn find_by_id(&self, id: &CheckoutId) -> Result<Option<CheckoutController>, DomainError> {
            let found = self.0.find_by_id(id).await;
            tokio::task::yield_now().await;
            found
        }

        async fn delete(&self, id: &CheckoutId) -> Result<(), DomainError> {
            self.0.delete(id).await
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.0.count().await
        }
    }

    fn yielding_handler(f: &Fixture) -> DispatchStepEventHandler {
        DispatchStepEventHandler::new(
            Arc::new(YieldingRepository(f.repository.clone())),
            f.bus.clone(),
            NavigationPaths::default(),
        )
    }

    #[tokio::test]
    async fn concurrent_double_submission_applies_once() {
        let f = fixture();
        let id = start(&f, "abc", Locale::En).await;
        let handler = yielding_handler(&f);

        let (first, second) = tokio::join!(
            handler.handle(command(id, session_selected())),
            handler.handle(command(id, session_selected())),
        );
        let outcomes = [first.unwrap().outcome, second.unwrap().outcome];

        let advanced = outcomes
            .iter()
            .filter(|o| matches!(o, TransitionOutcome::Advanced { .. }))
            .count();
        let ignored = outcomes.iter().filter(|o| o.is_ignored()).count();
        assert_eq!((advanced, ignored), (1, 1));

        let stored = f.repository.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.session().unwrap().current_stage(), CheckoutStage::Plan);
        let selections = f
            .bus
            .event_types_for(id)
            .into_iter()
            .filter(|t| t == "checkout.session_selected.v1")
            .count();
        assert_eq!(selections, 1);
        assert_eq!(handler.transitions.in_flight(), 0);
    }

    #[tokio::test]
    async fn busy_checkout_does_not_block_another() {
        let f = fixture();
        let busy = start(&f, "abc", Locale::En).await;
        let other = start(&f, "abc", Locale::En).await;
        let handler = handler(&f);

        let held = handler.transitions.acquire(busy).await;

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            handler.handle(command(other, session_selected())),
        )
        .await
        .expect("dispatch on another checkout waited for the busy one")
        .unwrap();
        assert!(matches!(result.outcome, TransitionOutcome::Advanced { .. }));

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            handler.handle(command(busy, session_selected())),
        )
        .await;
        assert!(blocked.is_err());

        drop(held);
        let result = handler.handle(command(busy, session_selected())).await.unwrap();
        assert!(matches!(result.outcome, TransitionOutcome::Advanced { .. }));
        assert_eq!(handler.transitions.in_flight(), 0);
    }
}
