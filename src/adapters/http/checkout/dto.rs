//! Request and response DTOs for checkout endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::checkout::{CheckoutView, TransitionOutcome};
use crate::domain::foundation::CheckoutId;

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct StartCheckoutRequest {
    pub course_id: String,
    /// Locale code; unknown or missing codes use the configured default.
    #[serde(default)]
    pub locale: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Response carrying the current checkout view.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub checkout_id: CheckoutId,
    pub view: CheckoutView,
}

/// Response to a dispatched step event.
#[derive(Debug, Clone, Serialize)]
pub struct StepEventResponse {
    pub outcome: TransitionOutcome,
    /// Set only while the checkout is still live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<CheckoutView>,
    /// Where the host should navigate when the flow was left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
