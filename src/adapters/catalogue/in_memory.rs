//! In-memory course catalogue.
//!
//! Serves course descriptors from a map, optionally seeded from a YAML file.
//! Used in development and tests; supports error injection and call counting.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::checkout::CourseDescriptor;
use crate::domain::foundation::CourseId;
use crate::ports::{CourseLookup, CourseLookupError};

/// Failures loading a catalogue seed file.
#[derive(Debug, Error)]
pub enum CatalogueSeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Duplicate course id in seed file: {0}")]
    DuplicateCourse(String),
}

/// Layout of a seed file.
///
/// ```yaml
/// courses:
///   - id: rust-101
///     slug: intro-to-rust
///     title: Intro to Rust
///     format: scheduled
/// ```
#[derive(Debug, Deserialize)]
struct CatalogueSeed {
    #[serde(default)]
    courses: Vec<CourseDescriptor>,
}

/// In-memory catalogue keyed by course id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseCatalogue {
    courses: Arc<RwLock<HashMap<CourseId, CourseDescriptor>>>,
    next_error: Arc<RwLock<Option<CourseLookupError>>>,
    fetch_count: Arc<AtomicUsize>,
}

impl InMemoryCourseCatalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue holding the given courses.
    pub fn with_courses(courses: impl IntoIterator<Item = CourseDescriptor>) -> Self {
        let map = courses
            .into_iter()
            .map(|course| (course.id.clone(), course))
            .collect();
        Self {
            courses: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    /// Loads a catalogue from a YAML seed file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogueSeedError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogueSeedError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|err| match err {
            CatalogueSeedError::Parse { source, .. } => CatalogueSeedError::Parse {
                path: display,
                source,
            },
            other => other,
        })
    }

    /// Parses a catalogue from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogueSeedError> {
        let seed: CatalogueSeed =
            serde_yaml::from_str(raw).map_err(|source| CatalogueSeedError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;

        let mut map = HashMap::with_capacity(seed.courses.len());
        for course in seed.courses {
            if map.contains_key(&course.id) {
                return Err(CatalogueSeedError::DuplicateCourse(course.id.to_string()));
            }
            map.insert(course.id.clone(), course);
        }

        Ok(Self {
            courses: Arc::new(RwLock::new(map)),
            ..Self::default()
        })
    }

    /// Adds or replaces a course.
    pub async fn insert(&self, course: CourseDescriptor) {
        self.courses.write().await.insert(course.id.clone(), course);
    }

    /// Makes the next fetch fail with the given error.
    pub async fn fail_next(&self, error: CourseLookupError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of courses held.
    pub async fn len(&self) -> usize {
        self.courses.read().await.len()
    }

    /// Returns true if the catalogue holds no course.
    pub async fn is_empty(&self) -> bool {
        self.courses.read().await.is_empty()
    }

    /// Number of fetches served, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CourseLookup for InMemoryCourseCatalogue {
    async fn fetch(&self, course_id: &CourseId) -> Result<Option<CourseDescriptor>, CourseLookupError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.courses.read().await.get(course_id).cloned())
    }
}
