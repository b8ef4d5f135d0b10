//! Domain module containing core business logic and data types
//!
//! This module defines the habit entity, its value objects (cue, frequency,
//! quantity, schedule) and the rules for how lifecycle and per-day state may
//! change. Nothing in here performs I/O.

pub mod cue;
pub mod frequency;
pub mod habit;
pub mod measured;
pub mod quantity;
pub mod schedule;
pub mod types;

// Re-export public types for easy access
pub use cue::*;
pub use frequency::*;
pub use habit::*;
pub use measured::*;
pub use quantity::*;
pub use schedule::*;
pub use types::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Habit name cannot be empty")]
    EmptyName,

    #[error("Habit must have a schedule")]
    MissingSchedule,

    #[error("Cue description cannot be empty")]
    InvalidCue,

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Progress value cannot be negative")]
    NegativeProgress,

    #[error("Progress value must be a finite number")]
    NonFiniteProgress,

    #[error("Cannot activate an archived habit. Unarchive it first.")]
    CannotActivateArchived,

    #[error("Cannot deactivate an archived habit")]
    CannotDeactivateArchived,

    #[error("Only archived habits can be unarchived")]
    NotArchived,

    #[error("Cannot {action} for an archived habit")]
    ArchivedHabit { action: &'static str },

    #[error("Cannot {action} for an inactive habit")]
    InactiveHabit { action: &'static str },

    #[error("Status for {day} already recorded. Habits can only be marked once per day.")]
    DuplicateDayRecord { day: NaiveDate },

    #[error("{0}")]
    UnsupportedOperation(String),
}

/// Broad category of a [`DomainError`], used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input at construction or in a progress value
    Validation,
    /// Operation not allowed in the habit's current lifecycle state
    State,
    /// A per-day record already exists
    Conflict,
    /// Operation does not apply to this kind of habit
    Unsupported,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EmptyName
            | DomainError::MissingSchedule
            | DomainError::InvalidCue
            | DomainError::InvalidFrequency(_)
            | DomainError::InvalidQuantity(_)
            | DomainError::InvalidSchedule(_)
            | DomainError::NegativeProgress
            | DomainError::NonFiniteProgress => ErrorKind::Validation,
            DomainError::CannotActivateArchived
            | DomainError::CannotDeactivateArchived
            | DomainError::NotArchived
            | DomainError::ArchivedHabit { .. }
            | DomainError::InactiveHabit { .. } => ErrorKind::State,
            DomainError::DuplicateDayRecord { .. } => ErrorKind::Conflict,
            DomainError::UnsupportedOperation(_) => ErrorKind::Unsupported,
        }
    }
}
