//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CourseLookup` - catalogue collaborator resolving course descriptors
//! - `CheckoutRepository` - live checkouts addressed by id
//! - `EventPublisher` / `EventSubscriber` - checkout event transport

mod checkout_repository;
mod course_lookup;
mod event_bus;

pub use checkout_repository::CheckoutRepository;
pub use course_lookup::{CourseLookup, CourseLookupError};
pub use event_bus::{EventHandler, EventPublisher, EventSubscriber};
