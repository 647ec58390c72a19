//! HTTP adapter for checkout endpoints.
//!
//! Exposes the checkout flow via REST API:
//! - `POST /api/checkout` - Start a checkout (performs the course lookup)
//! - `GET /api/checkout/:id` - Current view (loading, active, not found)
//! - `POST /api/checkout/:id/events` - Dispatch a tagged step event

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CheckoutApiError, CheckoutAppState};
pub use routes::{checkout_router, checkout_routes};
