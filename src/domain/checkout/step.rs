//! Step and StepList - the tagged stage list the indicator and guards read.
//!
//! There is exactly one canonical list of four steps. Skipping the Session
//! stage is an annotation on that list, never a different list.

use serde::{Deserialize, Serialize};

use super::CheckoutStage;
use crate::domain::foundation::Locale;

/// Data representation of a stage, including its skip flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub stage: CheckoutStage,
    pub label: String,
    pub skipped: bool,
}

impl Step {
    /// Creates a step for a stage with its translated label.
    pub fn new(stage: CheckoutStage, locale: Locale, skipped: bool) -> Self {
        Self {
            stage,
            label: stage.label(locale).to_string(),
            skipped,
        }
    }

    /// Returns the 1-based stage id.
    pub fn id(&self) -> u8 {
        self.stage.id()
    }
}

/// Ordered list of the four checkout steps, built once per checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    /// Builds the canonical list. Only the Session step can be skipped.
    pub fn new(skip_session_step: bool, locale: Locale) -> Self {
        let steps = CheckoutStage::all()
            .iter()
            .map(|stage| {
                let skipped = skip_session_step && *stage == CheckoutStage::Session;
                Step::new(*stage, locale, skipped)
            })
            .collect();
        Self { steps }
    }

    /// Returns every step, skipped ones included.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the steps that are rendered to the learner.
    pub fn visible(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| !step.skipped)
    }

    /// Returns true if the stage is skipped in this checkout.
    pub fn is_skipped(&self, stage: CheckoutStage) -> bool {
        self.steps
            .iter()
            .any(|step| step.stage == stage && step.skipped)
    }

    /// Returns the first non-skipped stage, where every checkout starts.
    pub fn first_active(&self) -> CheckoutStage {
        self.visible()
            .next()
            .map(|step| step.stage)
            .unwrap_or(CheckoutStage::Plan)
    }

    /// Returns the stage a back-navigation from `stage` lands on, or None
    /// when going back leaves the flow.
    pub fn previous_visible(&self, stage: CheckoutStage) -> Option<CheckoutStage> {
        stage
            .previous()
            .filter(|previous| !self.is_skipped(*previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_always_holds_four_steps_in_order() {
        for skip in [true, false] {
            let list = StepList::new(skip, Locale::En);
            let ids: Vec<u8> = list.steps().iter().map(Step::id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn only_session_is_marked_skipped() {
        let list = StepList::new(true, Locale::En);
        assert!(list.is_skipped(CheckoutStage::Session));
        assert!(!list.is_skipped(CheckoutStage::Plan));
        assert_eq!(list.visible().count(), 3);
    }

    #[test]
    fn first_active_is_session_for_scheduled_courses() {
        assert_eq!(StepList::new(false, Locale::En).first_active(), CheckoutStage::Session);
    }

    #[test]
    fn first_active_is_plan_when_session_skipped() {
        assert_eq!(StepList::new(true, Locale::En).first_active(), CheckoutStage::Plan);
    }

    #[test]
    fn previous_visible_exits_before_a_skipped_session() {
        let skipped = StepList::new(true, Locale::En);
        assert_eq!(skipped.previous_visible(CheckoutStage::Plan), None);
        assert_eq!(
            skipped.previous_visible(CheckoutStage::Payment),
            Some(CheckoutStage::Plan)
        );

        let full = StepList::new(false, Locale::En);
        assert_eq!(full.previous_visible(CheckoutStage::Plan), Some(CheckoutStage::Session));
        assert_eq!(full.previous_visible(CheckoutStage::Session), None);
    }

    #[test]
    fn labels_follow_locale() {
        let list = StepList::new(false, Locale::Es);
        let labels: Vec<&str> = list.steps().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Sesión", "Plan", "Pago", "Confirmación"]);
    }
}
