//! Exit targets of the checkout flow.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Locale};

/// Where the learner is sent when the flow is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationTarget {
    /// Early back-out from the first visible stage.
    CourseDetail { course_id: CourseId, slug: String },
    /// Access granted after confirmation.
    Dashboard,
    /// Course could not be resolved.
    Catalogue,
}

/// Path templates for rendering navigation targets.
///
/// Every path is prefixed with the locale code: `/{locale}{path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPaths {
    /// Prefix joined with the course slug, e.g. `/courses`.
    pub course_detail_prefix: String,
    pub dashboard_path: String,
    pub catalogue_path: String,
}

impl Default for NavigationPaths {
    fn default() -> Self {
        Self {
            course_detail_prefix: "/courses".to_string(),
            dashboard_path: "/dashboard".to_string(),
            catalogue_path: "/courses".to_string(),
        }
    }
}

impl NavigationPaths {
    /// Renders a target as a locale-prefixed path.
    pub fn render(&self, target: &NavigationTarget, locale: Locale) -> String {
        let path = match target {
            NavigationTarget::CourseDetail { slug, .. } => format!(
                "{}/{}",
                self.course_detail_prefix.trim_end_matches('/'),
                slug
            ),
            NavigationTarget::Dashboard => self.dashboard_path.clone(),
            NavigationTarget::Catalogue => self.catalogue_path.clone(),
        };
        format!("/{}{}", locale.code(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_detail() -> NavigationTarget {
        NavigationTarget::CourseDetail {
            course_id: CourseId::new("abc").unwrap(),
            slug: "intro-to-rust".to_string(),
        }
    }

    #[test]
    fn renders_locale_prefixed_paths() {
        let paths = NavigationPaths::default();
        assert_eq!(
            paths.render(&course_detail(), Locale::Es),
            "/es/courses/intro-to-rust"
        );
        assert_eq!(paths.render(&NavigationTarget::Dashboard, Locale::En), "/en/dashboard");
        assert_eq!(paths.render(&NavigationTarget::Catalogue, Locale::En), "/en/courses");
    }

    #[test]
    fn tolerates_trailing_slash_on_prefix() {
        let paths = NavigationPaths {
            course_detail_prefix: "/cursos/".to_string(),
            ..Default::default()
        };
        assert_eq!(paths.render(&course_detail(), Locale::Es), "/es/cursos/intro-to-rust");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(NavigationTarget::Dashboard).unwrap();
        assert_eq!(json["type"], "dashboard");
    }
}
