//! Habit entity and related functionality
//!
//! This module defines the core Habit struct: identity, naming, the
//! active/inactive/archived lifecycle and the per-day completion records
//! shared by both kinds of habit. Completion habits are built here; the
//! measured variant's progress tracking lives in `measured.rs`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    day_key, CompletionStatus, Cue, DomainError, HabitId, HabitKind, HabitStatus, MeasuredState,
    Quantity, Schedule, ScheduleProps,
};

/// Construction input for a completion (done / not done) habit
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionHabitProps {
    pub name: String,
    pub description: String,
    pub schedule: Option<ScheduleProps>,
    pub cue: Option<String>,
    /// Name of a linked note in the user's notebook
    pub note_name: Option<String>,
}

/// Kind-specific state of a habit
///
/// The tag decides which per-day operations a habit supports: completion
/// habits are marked explicitly, measured habits derive their daily status
/// from recorded progress.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitVariant {
    Completion,
    Measured(MeasuredState),
}

/// A habit represents something the user wants to do regularly
///
/// Fields are private so the invariants hold after construction: the name is
/// never blank, a schedule is always present and per-day records only change
/// through the marking and progress operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    id: HabitId,
    name: String,
    description: String,
    status: HabitStatus,
    schedule: Schedule,
    cue: Option<Cue>,
    note_name: Option<String>,
    pub(crate) completion_records: BTreeMap<NaiveDate, CompletionStatus>,
    pub(crate) variant: HabitVariant,
}

impl Habit {
    /// Create a new completion habit with validation
    pub fn completion(props: CompletionHabitProps) -> Result<Self, DomainError> {
        let CompletionHabitProps {
            name,
            description,
            schedule,
            cue,
            note_name,
        } = props;

        Self::build(
            &name,
            description,
            schedule,
            cue.as_deref(),
            note_name,
            HabitVariant::Completion,
        )
    }

    /// Shared constructor behind both factories
    ///
    /// Validates the name, then builds every value object from its props so a
    /// bad frequency or schedule is reported before any entity exists.
    pub(crate) fn build(
        name: &str,
        description: String,
        schedule: Option<ScheduleProps>,
        cue: Option<&str>,
        note_name: Option<String>,
        variant: HabitVariant,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(name)?;
        let schedule = schedule.ok_or(DomainError::MissingSchedule)?.build()?;
        let cue = cue.map(Cue::create).transpose()?;

        Ok(Self {
            id: HabitId::new(),
            name,
            description,
            status: HabitStatus::Active,
            schedule,
            cue,
            note_name: note_name.and_then(Self::normalize_note_name),
            completion_records: BTreeMap::new(),
            variant,
        })
    }

    /// Restore persisted identity and per-day state onto a freshly built habit
    ///
    /// Used by storage adapters after re-running the factory on a stored
    /// record. Progress records are ignored for completion habits.
    pub(crate) fn with_persisted_state(
        mut self,
        id: HabitId,
        status: HabitStatus,
        completion_records: BTreeMap<NaiveDate, CompletionStatus>,
        progress_records: BTreeMap<NaiveDate, f64>,
    ) -> Self {
        self.id = id;
        self.status = status;
        self.completion_records = completion_records;
        if let HabitVariant::Measured(state) = &mut self.variant {
            state.progress_records = progress_records;
        }
        self
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> HabitKind {
        match self.variant {
            HabitVariant::Completion => HabitKind::Completion,
            HabitVariant::Measured(_) => HabitKind::Measured,
        }
    }

    pub fn status(&self) -> HabitStatus {
        self.status
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn cue(&self) -> Option<&Cue> {
        self.cue.as_ref()
    }

    pub fn note_name(&self) -> Option<&str> {
        self.note_name.as_deref()
    }

    pub fn variant(&self) -> &HabitVariant {
        &self.variant
    }

    /// Target of a measured habit, `None` for completion habits
    pub fn quantity(&self) -> Option<&Quantity> {
        match &self.variant {
            HabitVariant::Measured(state) => Some(state.quantity()),
            HabitVariant::Completion => None,
        }
    }

    pub fn completion_records(&self) -> &BTreeMap<NaiveDate, CompletionStatus> {
        &self.completion_records
    }

    /// Rename the habit, applying the same rule as construction
    pub fn set_name(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    pub fn set_cue(&mut self, cue: Option<Cue>) {
        self.cue = cue;
    }

    pub fn set_note_name(&mut self, note_name: Option<String>) {
        self.note_name = note_name.and_then(Self::normalize_note_name);
    }

    // Lifecycle

    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.status == HabitStatus::Archived {
            return Err(DomainError::CannotActivateArchived);
        }
        self.status = HabitStatus::Active;
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if self.status == HabitStatus::Archived {
            return Err(DomainError::CannotDeactivateArchived);
        }
        self.status = HabitStatus::Inactive;
        Ok(())
    }

    /// Archive the habit; valid from any status and idempotent
    pub fn archive(&mut self) {
        self.status = HabitStatus::Archived;
    }

    pub fn unarchive(&mut self) -> Result<(), DomainError> {
        if self.status != HabitStatus::Archived {
            return Err(DomainError::NotArchived);
        }
        self.status = HabitStatus::Active;
        Ok(())
    }

    // Per-day records

    /// Status recorded for the day containing `at`, `Pending` if none
    pub fn completion_status(&self, at: DateTime<Utc>) -> CompletionStatus {
        self.completion_records
            .get(&day_key(at))
            .copied()
            .unwrap_or(CompletionStatus::Pending)
    }

    /// Mark the day as skipped; available on both kinds of habit
    pub fn mark_skipped(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.record_day(at, CompletionStatus::Skipped, "mark skipped")
    }

    /// Mark the day as completed
    ///
    /// Measured habits reject this: their completion is derived from progress.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        match self.variant {
            HabitVariant::Completion => {
                self.record_day(at, CompletionStatus::Completed, "mark completion")
            }
            HabitVariant::Measured(_) => Err(DomainError::UnsupportedOperation(
                "Measured habits cannot be marked as completed. Progress is determined automatically based on goal achievement.".to_string(),
            )),
        }
    }

    /// Mark the day as missed; same restriction as [`Habit::mark_completed`]
    pub fn mark_missed(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        match self.variant {
            HabitVariant::Completion => self.record_day(at, CompletionStatus::Missed, "mark missed"),
            HabitVariant::Measured(_) => Err(DomainError::UnsupportedOperation(
                "Measured habits cannot be marked as missed. Progress is determined automatically based on goal achievement.".to_string(),
            )),
        }
    }

    /// Lifecycle gate applied before any per-day write
    pub(crate) fn ensure_writable(&self, action: &'static str) -> Result<(), DomainError> {
        match self.status {
            HabitStatus::Archived => Err(DomainError::ArchivedHabit { action }),
            HabitStatus::Inactive => Err(DomainError::InactiveHabit { action }),
            HabitStatus::Active => Ok(()),
        }
    }

    /// Write-once record for a day
    fn record_day(
        &mut self,
        at: DateTime<Utc>,
        status: CompletionStatus,
        action: &'static str,
    ) -> Result<(), DomainError> {
        self.ensure_writable(action)?;

        let day = day_key(at);
        if self.completion_records.contains_key(&day) {
            return Err(DomainError::DuplicateDayRecord { day });
        }
        self.completion_records.insert(day, status);
        Ok(())
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(trimmed.to_string())
    }

    fn normalize_note_name(note_name: String) -> Option<String> {
        let trimmed = note_name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
