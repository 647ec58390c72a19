//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod checkout;

pub use checkout::{
    DispatchStepEventCommand, DispatchStepEventHandler, DispatchStepEventResult,
    GetCheckoutViewHandler, GetCheckoutViewQuery, StartCheckoutCommand, StartCheckoutHandler,
    StartCheckoutResult,
};
