//! CheckoutStage - the four named points of the enrollment checkout.
//!
//! # Stage Order
//!
//! 1. Session → 2. Plan → 3. Payment → 4. Confirmation
//!
//! All ordering questions (next, previous, numeric id) go through this type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Locale, ValidationError};

/// A stage of the checkout flow. The numeric id is fixed to 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Session,
    Plan,
    Payment,
    Confirmation,
}

impl CheckoutStage {
    /// The canonical stage order.
    pub const ORDER: [CheckoutStage; 4] = [
        CheckoutStage::Session,
        CheckoutStage::Plan,
        CheckoutStage::Payment,
        CheckoutStage::Confirmation,
    ];

    /// Returns all stages in order.
    pub fn all() -> &'static [CheckoutStage; 4] {
        &Self::ORDER
    }

    /// Returns the 1-based stage id.
    pub fn id(&self) -> u8 {
        match self {
            CheckoutStage::Session => 1,
            CheckoutStage::Plan => 2,
            CheckoutStage::Payment => 3,
            CheckoutStage::Confirmation => 4,
        }
    }

    /// Resolves a stage from its 1-based id.
    pub fn from_id(id: u8) -> Result<Self, ValidationError> {
        Self::ORDER
            .iter()
            .copied()
            .find(|stage| stage.id() == id)
            .ok_or_else(|| ValidationError::invalid_format("step", format!("no stage with id {}", id)))
    }

    /// Returns the next stage, or None at Confirmation.
    pub fn next(&self) -> Option<CheckoutStage> {
        Self::ORDER.get(usize::from(self.id())).copied()
    }

    /// Returns the previous stage, or None at Session.
    pub fn previous(&self) -> Option<CheckoutStage> {
        let index = usize::from(self.id()) - 1;
        index.checked_sub(1).and_then(|i| Self::ORDER.get(i)).copied()
    }

    /// Returns the translated label shown in the step indicator.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (CheckoutStage::Session, Locale::En) => "Session",
            (CheckoutStage::Plan, Locale::En) => "Plan",
            (CheckoutStage::Payment, Locale::En) => "Payment",
            (CheckoutStage::Confirmation, Locale::En) => "Confirmation",
            (CheckoutStage::Session, Locale::Es) => "Sesión",
            (CheckoutStage::Plan, Locale::Es) => "Plan",
            (CheckoutStage::Payment, Locale::Es) => "Pago",
            (CheckoutStage::Confirmation, Locale::Es) => "Confirmación",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckoutStage::Session => "session",
            CheckoutStage::Plan => "plan",
            CheckoutStage::Payment => "payment",
            CheckoutStage::Confirmation => "confirmation",
        };
        write!(f, "{}", s)
    }
}
