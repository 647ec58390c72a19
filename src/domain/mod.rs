//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `checkout` - Enrollment checkout stages, indicator, aggregate and controller

pub mod checkout;
pub mod foundation;
