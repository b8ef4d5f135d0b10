//! Measured habits: progress tracking and derived completion
//!
//! A measured habit records an amount per day. After every write the day's
//! completion status is recomputed from that amount and the habit's target,
//! so callers never assert completion for these habits directly.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    day_key, CompletionStatus, DomainError, Habit, HabitVariant, Quantity, ScheduleProps,
    TargetType,
};

/// Unvalidated target input for a measured habit
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityProps {
    pub amount: f64,
    pub unit: String,
    pub target_type: TargetType,
}

/// Construction input for a measured habit
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredHabitProps {
    pub name: String,
    pub description: String,
    pub quantity: QuantityProps,
    pub schedule: Option<ScheduleProps>,
    pub cue: Option<String>,
}

/// State only measured habits carry
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredState {
    quantity: Quantity,
    pub(crate) progress_records: BTreeMap<NaiveDate, f64>,
}

impl MeasuredState {
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    pub fn progress_records(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.progress_records
    }

    /// Status a day ends up with for a given amount of progress
    ///
    /// For a goal, reaching the target completes the day and anything below
    /// it counts as committed. For a limit, reaching the cap misses the day.
    pub fn derive_status(&self, progress: f64) -> CompletionStatus {
        let reached = progress >= self.quantity.target_amount();

        match (self.quantity.target_type(), reached) {
            (TargetType::Goal, true) => CompletionStatus::Completed,
            (TargetType::Goal, false) => CompletionStatus::Committed,
            (TargetType::Limit, true) => CompletionStatus::Missed,
            (TargetType::Limit, false) => CompletionStatus::Completed,
        }
    }
}

impl Habit {
    /// Create a new measured habit with validation
    pub fn measured(props: MeasuredHabitProps) -> Result<Self, DomainError> {
        let MeasuredHabitProps {
            name,
            description,
            quantity,
            schedule,
            cue,
        } = props;

        // Shared fields are validated before the quantity
        let mut habit = Self::build(
            &name,
            description,
            schedule,
            cue.as_deref(),
            None,
            HabitVariant::Completion,
        )?;

        let quantity = Quantity::create(quantity.amount, &quantity.unit, quantity.target_type)?;
        habit.variant = HabitVariant::Measured(MeasuredState {
            quantity,
            progress_records: BTreeMap::new(),
        });
        Ok(habit)
    }

    /// Per-day progress of a measured habit, `None` for completion habits
    pub fn progress_records(&self) -> Option<&BTreeMap<NaiveDate, f64>> {
        match &self.variant {
            HabitVariant::Measured(state) => Some(state.progress_records()),
            HabitVariant::Completion => None,
        }
    }

    /// Replace the day's progress with `value`
    pub fn set_progress(&mut self, at: DateTime<Utc>, value: f64) -> Result<(), DomainError> {
        self.write_progress(at, value, "set progress", |_, value| value)
    }

    /// Add `value` to the day's progress
    pub fn add_progress(&mut self, at: DateTime<Utc>, value: f64) -> Result<(), DomainError> {
        self.write_progress(at, value, "add progress", |current, value| current + value)
    }

    /// Amount recorded for the day, 0 when nothing was recorded
    pub fn progress(&self, at: DateTime<Utc>) -> f64 {
        self.progress_records()
            .and_then(|records| records.get(&day_key(at)).copied())
            .unwrap_or(0.0)
    }

    fn write_progress(
        &mut self,
        at: DateTime<Utc>,
        value: f64,
        action: &'static str,
        combine: impl FnOnce(f64, f64) -> f64,
    ) -> Result<(), DomainError> {
        if matches!(self.variant, HabitVariant::Completion) {
            return Err(DomainError::UnsupportedOperation(format!(
                "Completion habits do not track progress; cannot {}",
                action
            )));
        }
        self.ensure_writable(action)?;
        if value.is_nan() || value < 0.0 {
            return Err(DomainError::NegativeProgress);
        }
        if !value.is_finite() {
            return Err(DomainError::NonFiniteProgress);
        }

        let day = day_key(at);
        if let HabitVariant::Measured(state) = &mut self.variant {
            let current = state.progress_records.get(&day).copied().unwrap_or(0.0);
            let combined = combine(current, value);
            if !combined.is_finite() {
                return Err(DomainError::NonFiniteProgress);
            }
            state.progress_records.insert(day, combined);
        }

        self.check_completion(day);
        Ok(())
    }

    /// Recompute the derived status for a day from its recorded progress
    ///
    /// A day without progress keeps whatever it had. Otherwise the derived
    /// value replaces the previous one, so lowering progress below a goal
    /// turns a completed day back into a committed one.
    fn check_completion(&mut self, day: NaiveDate) {
        let derived = match &self.variant {
            HabitVariant::Measured(state) => state
                .progress_records
                .get(&day)
                .map(|progress| state.derive_status(*progress)),
            HabitVariant::Completion => None,
        };

        if let Some(status) = derived {
            self.completion_records.insert(day, status);
        }
    }
}
