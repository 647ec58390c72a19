//! Course lookup port - resolves a course id to its catalogue descriptor.
//!
//! This is the only asynchronous call in a checkout. The checkout core does
//! not retry or time out; any such policy belongs to the implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::checkout::CourseDescriptor;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode};

/// Port for the course catalogue.
///
/// `Ok(None)` is the not-found signal. Transport failures are errors;
/// callers decide whether to treat them as not-found.
///
/// # Example
///
/// ```ignore
/// let course = lookup.fetch(&course_id).await.unwrap_or(None);
/// controller.resolve_course(course)?;
/// ```
#[async_trait]
pub trait CourseLookup: Send + Sync {
    /// Fetch the descriptor for a course.
    async fn fetch(&self, course_id: &CourseId) -> Result<Option<CourseDescriptor>, CourseLookupError>;
}

/// Failures of the catalogue collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CourseLookupError {
    #[error("Catalogue unreachable: {0}")]
    Unavailable(String),

    #[error("Catalogue request timed out after {0}s")]
    Timeout(u64),

    #[error("Catalogue returned status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Invalid catalogue response: {0}")]
    InvalidResponse(String),
}

impl From<CourseLookupError> for DomainError {
    fn from(err: CourseLookupError) -> Self {
        DomainError::new(ErrorCode::ExternalServiceError, err.to_string())
    }
}
