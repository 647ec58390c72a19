//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) are kept apart from query handlers (read).

pub mod handlers;

pub use handlers::{
    DispatchStepEventCommand, DispatchStepEventHandler, DispatchStepEventResult,
    GetCheckoutViewHandler, GetCheckoutViewQuery, StartCheckoutCommand, StartCheckoutHandler,
    StartCheckoutResult,
};
