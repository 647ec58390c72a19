//! Checkout repository port.
//!
//! Holds live checkout controllers addressed by `CheckoutId`. A checkout only
//! lives for one attempt, so implementations are expected to be in-memory.

use async_trait::async_trait;

use crate::domain::checkout::CheckoutController;
use crate::domain::foundation::{CheckoutId, DomainError};

/// Repository port for checkout controllers.
#[async_trait]
pub trait CheckoutRepository: Send + Sync {
    /// Insert or replace a checkout.
    async fn save(&self, checkout: &CheckoutController) -> Result<(), DomainError>;

    /// Find a checkout by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CheckoutId) -> Result<Option<CheckoutController>, DomainError>;

    /// Discard a checkout. Removing a missing checkout is not an error.
    async fn delete(&self, id: &CheckoutId) -> Result<(), DomainError>;

    /// Number of live checkouts.
    async fn count(&self) -> Result<usize, DomainError>;
}
