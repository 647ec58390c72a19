//! Navigation configuration - where the flow sends the learner on exit

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::checkout::NavigationPaths;
use crate::domain::foundation::Locale;

/// Navigation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Course detail pages live at `{prefix}/{slug}`
    #[serde(default = "default_course_detail_prefix")]
    pub course_detail_prefix: String,

    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,

    #[serde(default = "default_catalogue_path")]
    pub catalogue_path: String,

    /// Locale used when a request names none or an unsupported one
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl NavigationConfig {
    pub fn paths(&self) -> NavigationPaths {
        NavigationPaths {
            course_detail_prefix: self.course_detail_prefix.clone(),
            dashboard_path: self.dashboard_path.clone(),
            catalogue_path: self.catalogue_path.clone(),
        }
    }

    pub fn default_locale(&self) -> Result<Locale, ValidationError> {
        self.default_locale
            .parse()
            .map_err(|_| ValidationError::UnsupportedLocale(self.default_locale.clone()))
    }

    /// Validate navigation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for path in [
            &self.course_detail_prefix,
            &self.dashboard_path,
            &self.catalogue_path,
        ] {
            if !path.starts_with('/') {
                return Err(ValidationError::InvalidNavigationPath(path.clone()));
            }
        }
        self.default_locale()?;
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            course_detail_prefix: default_course_detail_prefix(),
            dashboard_path: default_dashboard_path(),
            catalogue_path: default_catalogue_path(),
            default_locale: default_locale(),
        }
    }
}

fn default_course_detail_prefix() -> String {
    "/courses".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

fn default_catalogue_path() -> String {
    "/courses".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}
