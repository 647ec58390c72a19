//! Event bus adapters.
//!
//! - `InMemoryEventBus` - in-process bus with ordered delivery
//! - `CheckoutEventLogger` - handler writing checkout events to the log

mod event_logger;
mod in_memory;

pub use event_logger::CheckoutEventLogger;
pub use in_memory::InMemoryEventBus;
