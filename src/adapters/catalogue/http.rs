//! HTTP course lookup - fetches course descriptors from a catalogue service.
//!
//! `GET {base_url}/courses/{course_id}`: 200 carries a descriptor, 404 is the
//! not-found signal, anything else is an error. The course id always travels
//! as one percent-encoded path segment.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::checkout::CourseDescriptor;
use crate::domain::foundation::CourseId;
use crate::ports::{CourseLookup, CourseLookupError};

/// Configuration for the HTTP catalogue client.
#[derive(Debug, Clone)]
pub struct HttpCourseLookupConfig {
    /// Base URL of the catalogue API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpCourseLookupConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalogue client over HTTP.
pub struct HttpCourseLookup {
    base_url: Url,
    timeout: Duration,
    client: Client,
}

impl HttpCourseLookup {
    /// Creates the client.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the base URL cannot carry path segments or the HTTP
    /// client cannot be built.
    pub fn new(config: HttpCourseLookupConfig) -> Result<Self, CourseLookupError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CourseLookupError::Unavailable(format!("invalid catalogue URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CourseLookupError::Unavailable(format!(
                "catalogue URL {} cannot be a base",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CourseLookupError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            timeout: config.timeout,
            client,
        })
    }

    /// Builds the URL of one course.
    ///
    /// Returns `None` for `.` and `..`, which cannot name a path segment.
    fn course_url(&self, course_id: &CourseId) -> Option<Url> {
        if matches!(course_id.as_str(), "." | "..") {
            return None;
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("courses")
            .push(course_id.as_str());
        Some(url)
    }
}

#[async_trait]
impl CourseLookup for HttpCourseLookup {
    async fn fetch(&self, course_id: &CourseId) -> Result<Option<CourseDescriptor>, CourseLookupError> {
        let Some(url) = self.course_url(course_id) else {
            debug!(%course_id, "Course id cannot be addressed in the catalogue");
            return Ok(None);
        };
        debug!(%course_id, %url, "Fetching course from catalogue");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CourseLookupError::Timeout(self.timeout.as_secs())
                } else if e.is_connect() {
                    CourseLookupError::Unavailable(format!("Connection failed: {}", e))
                } else {
                    CourseLookupError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%course_id, status = status.as_u16(), "Catalogue returned an error status");
            return Err(CourseLookupError::UnexpectedStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let course = response
            .json::<CourseDescriptor>()
            .await
            .map_err(|e| CourseLookupError::InvalidResponse(e.to_string()))?;
        if course.id != *course_id {
            warn!(%course_id, returned = %course.id, "Catalogue answered for another course");
            return Err(CourseLookupError::InvalidResponse(format!(
                "requested course {} but received {}",
                course_id, course.id
            )));
        }
        Ok(Some(course))
    }
}
