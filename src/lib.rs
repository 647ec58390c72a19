//! Course Checkout - Enrollment checkout flow for the course marketplace
//!
//! A learner enrolling in a course walks through up to four stages: pick a
//! cohort session, pick a pricing plan, pay, and confirm. Self-paced courses
//! skip the session stage. This crate holds the checkout state machine, the
//! step indicator projection, the step view contracts, and the course lookup
//! port, plus the adapters that serve them over HTTP.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
