//! Quantity value object for measured habits

use crate::domain::{DomainError, TargetType};

/// Numeric target of a measured habit (e.g. "30 minutes", "at most 2 hours")
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    target_amount: f64,
    unit: String,
    target_type: TargetType,
}

impl Quantity {
    pub fn create(amount: f64, unit: &str, target_type: TargetType) -> Result<Self, DomainError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(DomainError::InvalidQuantity(
                "Target amount must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            target_amount: amount,
            unit: unit.to_string(),
            target_type,
        })
    }

    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    /// Display string for the target (e.g. "30 minutes")
    pub fn target_display(&self) -> String {
        if self.unit.trim().is_empty() {
            self.target_amount.to_string()
        } else {
            format!("{} {}", self.target_amount, self.unit)
        }
    }
}
