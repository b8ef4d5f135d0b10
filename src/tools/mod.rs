//! Habit tools
//!
//! Thin handlers that sit between a caller (the command-line binary) and the
//! domain: they validate input, load habits from storage, run one domain
//! operation and store the result. Each returns a serializable response.

pub mod create;
pub mod list;
pub mod log;
pub mod payload;
pub mod status;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use list::*;
pub use log::*;
pub use payload::*;
pub use status::*;
pub use update::*;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{weekday_name, DomainError, Habit, HabitId};
use crate::storage::{HabitStorage, StorageError};

/// Errors returned by the tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid habit ID format: {0}")]
    InvalidHabitId(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Short description of a habit included in most responses
#[derive(Debug, Clone, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl HabitSummary {
    pub fn from_habit(habit: &Habit) -> Self {
        let frequency = habit.schedule().frequency();

        Self {
            habit_id: habit.id().to_string(),
            name: habit.name().to_string(),
            description: habit.description().to_string(),
            kind: habit.kind().to_string(),
            status: habit.status().to_string(),
            interval: frequency.interval().to_string(),
            days_of_week: frequency
                .days_of_week()
                .map(|days| days.iter().map(|d| weekday_name(*d).to_string()).collect()),
            cue: habit.cue().map(|c| c.description().to_string()),
            note_name: habit.note_name().map(str::to_string),
            target: habit.quantity().map(|q| {
                format!("{} ({})", q.target_display(), q.target_type().as_str())
            }),
        }
    }
}

/// Parse a habit id argument
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidHabitId("Habit ID cannot be empty".to_string()));
    }
    HabitId::from_string(raw).map_err(|_| ToolError::InvalidHabitId(raw.to_string()))
}

/// Load a habit or report it as missing
pub(crate) fn load_habit<S: HabitStorage>(storage: &S, raw_id: &str) -> Result<Habit, ToolError> {
    let habit_id = parse_habit_id(raw_id)?;
    storage
        .find_habit(&habit_id)?
        .ok_or_else(|| ToolError::HabitNotFound(raw_id.to_string()))
}

/// Parse a day argument: a calendar date (taken as midnight UTC) or a full
/// RFC 3339 timestamp. No argument means now.
pub fn parse_day_arg(raw: Option<&str>) -> Result<DateTime<Utc>, ToolError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Utc::now()),
        Some(raw) => raw,
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| ToolError::InvalidDate(raw.to_string()))
}
