//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `catalogue` - Course lookup (HTTP catalogue service, in-memory/YAML seed)
//! - `events` - In-memory event bus and the checkout event logger
//! - `http` - Axum REST API
//! - `storage` - Checkout repository

pub mod catalogue;
pub mod events;
pub mod http;
pub mod storage;

pub use catalogue::{
    CatalogueSeedError, HttpCourseLookup, HttpCourseLookupConfig, InMemoryCourseCatalogue,
};
pub use events::{CheckoutEventLogger, InMemoryEventBus};
pub use http::{build_router, CheckoutAppState};
pub use storage::InMemoryCheckoutRepository;
