//! Storage adapters for live checkouts.

mod in_memory_checkout_repository;

pub use in_memory_checkout_repository::InMemoryCheckoutRepository;
