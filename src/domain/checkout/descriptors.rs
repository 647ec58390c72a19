//! Typed payloads exchanged with the catalogue and the step views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CohortSessionId, CourseId, PlanId, Timestamp, TransactionId};

/// How a course is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseFormat {
    /// Runs in cohorts; the learner must pick a session.
    Scheduled,
    /// No cohort scheduling; the Session stage is skipped.
    #[serde(alias = "self_paced")]
    SelfPaced,
}

impl CourseFormat {
    /// Returns true if the learner has to choose a cohort session.
    pub fn requires_session_selection(&self) -> bool {
        matches!(self, CourseFormat::Scheduled)
    }
}

/// Course as resolved by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDescriptor {
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    pub format: CourseFormat,
    #[serde(default, alias = "pricingOptions")]
    pub pricing_options: Vec<PlanDescriptor>,
}

/// Cohort session chosen in the Session stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub id: CohortSessionId,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One scheduled charge of a payment plan. Money is kept in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub amount_cents: i64,
    pub currency: String,
    /// Days after enrollment the charge is due (0 = at checkout).
    #[serde(default)]
    pub due_in_days: u32,
}

/// Payment plan chosen in the Plan stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDescriptor {
    pub id: PlanId,
    #[serde(default)]
    pub label: String,
    #[serde(default, alias = "priceSchedule")]
    pub price_schedule: Vec<Installment>,
}

impl PlanDescriptor {
    /// Number of charges in the schedule.
    pub fn installment_count(&self) -> usize {
        self.price_schedule.len()
    }
}

/// Success payload reported by the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    #[serde(alias = "transactionId")]
    pub transaction_id: TransactionId,
    #[serde(default, alias = "amountCents")]
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl PaymentReceipt {
    /// Creates a receipt stamped now.
    pub fn new(
        transaction_id: TransactionId,
        amount_cents: i64,
        currency: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id,
            amount_cents,
            currency: currency.into(),
            method: method.into(),
            timestamp: Timestamp::now(),
        }
    }
}
