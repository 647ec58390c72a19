//! StepIndicator - read-only projection of the checkout position.
//!
//! Skipped steps are filtered out before numbering, so the ordinals shown to
//! the learner never have a gap: with Session skipped, Plan reads "1 of 3".

use serde::Serialize;

use super::{CheckoutStage, Step};

/// Visual status of one indicator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepVisualStatus {
    Completed,
    Active,
    Pending,
}

/// One rendered entry of the indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorEntry {
    /// Underlying stage id (1..=4).
    pub step_id: u8,
    /// 1-based position within the visible steps.
    pub ordinal: usize,
    pub label: String,
    pub status: StepVisualStatus,
}

/// Display model for the step indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub entries: Vec<IndicatorEntry>,
}

impl StepIndicator {
    /// Projects the ordered steps and the current stage into entries.
    pub fn project(steps: &[Step], current: CheckoutStage) -> Self {
        let current_id = current.id();
        let entries = steps
            .iter()
            .filter(|step| !step.skipped)
            .enumerate()
            .map(|(index, step)| IndicatorEntry {
                step_id: step.id(),
                ordinal: index + 1,
                label: step.label.clone(),
                status: match step.id() {
                    id if id < current_id => StepVisualStatus::Completed,
                    id if id == current_id => StepVisualStatus::Active,
                    _ => StepVisualStatus::Pending,
                },
            })
            .collect();
        Self { entries }
    }

    /// Number of visible steps.
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Returns the active entry, if the current stage is visible.
    pub fn active(&self) -> Option<&IndicatorEntry> {
        self.entries
            .iter()
            .find(|entry| entry.status == StepVisualStatus::Active)
    }

    /// Returns "step X of Y" as `(X, Y)`.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.active().map(|entry| (entry.ordinal, self.total()))
    }
}
