//! PaymentStatus of the current checkout attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the payment stage as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    /// Returns true once a payment has been captured.
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Success)
    }

    /// Returns true if the last attempt failed and can be retried.
    pub fn is_failed(&self) -> bool {
        matches!(self, PaymentStatus::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
