//! Tools for recording what happened on a given day
//!
//! `log_day` marks a completion habit's day explicitly; `record_progress`
//! feeds an amount into a measured habit and reports the derived status.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{day_key, CompletionStatus};
use crate::storage::HabitStorage;
use crate::tools::{load_habit, parse_day_arg, ToolError};

/// Explicit outcome for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DayMark {
    #[value(alias = "done")]
    Completed,
    Missed,
    #[value(alias = "skip")]
    Skipped,
}

/// How a progress value is applied to the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    /// Replace the day's amount
    Set,
    /// Add to the day's amount
    Add,
}

/// Parameters for marking a day
#[derive(Debug)]
pub struct LogDayParams {
    pub habit_id: String,
    pub mark: DayMark,
    /// Optional date, defaults to today
    pub date: Option<String>,
}

/// Parameters for recording progress
#[derive(Debug)]
pub struct ProgressParams {
    pub habit_id: String,
    pub mode: ProgressMode,
    pub value: f64,
    pub date: Option<String>,
}

/// State of one habit on one day after a write
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub success: bool,
    pub habit_id: String,
    pub day: String,
    pub status: CompletionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    pub message: String,
}

/// Mark a day as completed, missed or skipped
pub fn log_day<S: HabitStorage>(storage: &S, params: LogDayParams) -> Result<DayResponse, ToolError> {
    let mut habit = load_habit(storage, &params.habit_id)?;
    let at = parse_day_arg(params.date.as_deref())?;

    let result = match params.mark {
        DayMark::Completed => habit.mark_completed(at),
        DayMark::Missed => habit.mark_missed(at),
        DayMark::Skipped => habit.mark_skipped(at),
    };
    if let Err(e) = result {
        tracing::warn!("Could not mark habit {}: {}", habit.id(), e);
        return Err(e.into());
    }

    storage.update_habit(&habit)?;

    let status = habit.completion_status(at);
    tracing::info!("Marked habit {} as {} on {}", habit.id(), status, day_key(at));

    Ok(DayResponse {
        success: true,
        habit_id: habit.id().to_string(),
        day: day_key(at).to_string(),
        status,
        progress: None,
        message: format!("Marked '{}' as {} for {}", habit.name(), status, day_key(at)),
    })
}

/// Set or add progress on a measured habit
pub fn record_progress<S: HabitStorage>(
    storage: &S,
    params: ProgressParams,
) -> Result<DayResponse, ToolError> {
    let mut habit = load_habit(storage, &params.habit_id)?;
    let at = parse_day_arg(params.date.as_deref())?;

    let result = match params.mode {
        ProgressMode::Set => habit.set_progress(at, params.value),
        ProgressMode::Add => habit.add_progress(at, params.value),
    };
    if let Err(e) = result {
        tracing::warn!("Could not record progress ({:?}) on habit {}: {}", params.mode, habit.id(), e);
        return Err(e.into());
    }

    storage.update_habit(&habit)?;

    let progress = habit.progress(at);
    let status = habit.completion_status(at);
    let target = habit
        .quantity()
        .map(|q| q.target_display())
        .unwrap_or_default();
    tracing::info!(
        "Recorded progress {} for habit {} on {} ({})",
        progress,
        habit.id(),
        day_key(at),
        status
    );

    Ok(DayResponse {
        success: true,
        habit_id: habit.id().to_string(),
        day: day_key(at).to_string(),
        status,
        progress: Some(progress),
        message: format!(
            "'{}' is at {} of {} for {}: {}",
            habit.name(),
            progress,
            target,
            day_key(at),
            status
        ),
    })
}
