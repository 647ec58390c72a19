//! GetCheckoutViewHandler - Query handler for the current checkout view.

use std::sync::Arc;

use crate::domain::checkout::{CheckoutError, CheckoutView};
use crate::domain::foundation::CheckoutId;
use crate::ports::CheckoutRepository;

/// Query for a checkout's render model.
#[derive(Debug, Clone)]
pub struct GetCheckoutViewQuery {
    pub checkout_id: CheckoutId,
}

/// Handler for retrieving checkout views.
pub struct GetCheckoutViewHandler {
    repository: Arc<dyn CheckoutRepository>,
}

impl GetCheckoutViewHandler {
    pub fn new(repository: Arc<dyn CheckoutRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetCheckoutViewQuery) -> Result<CheckoutView, CheckoutError> {
        let checkout = self
            .repository
            .find_by_id(&query.checkout_id)
            .await?
            .ok_or(CheckoutError::NotFound(query.checkout_id))?;
        Ok(checkout.view())
    }
}
