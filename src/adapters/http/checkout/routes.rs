//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{dispatch_step_event, get_checkout, start_checkout, CheckoutAppState};

/// Create the checkout API router.
///
/// # Routes
///
/// - `POST /` - Start a checkout for a course
/// - `GET /:id` - Current checkout view
/// - `POST /:id/events` - Dispatch a step event
pub fn checkout_routes() -> Router<CheckoutAppState> {
    Router::new()
        .route("/", post(start_checkout))
        .route("/:id", get(get_checkout))
        .route("/:id/events", post(dispatch_step_event))
}

/// Create the checkout module router, mounted under `/checkout`.
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", checkout_router())
///     .with_state(state);
/// ```
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new().nest("/checkout", checkout_routes())
}
