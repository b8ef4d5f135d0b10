//! Tool for checking a habit's state on one day

use serde::Serialize;

use crate::domain::{day_key, CompletionStatus};
use crate::storage::HabitStorage;
use crate::tools::{load_habit, parse_day_arg, HabitSummary, ToolError};

/// Parameters for checking habit status
#[derive(Debug)]
pub struct StatusParams {
    pub habit_id: String,
    /// Day to report on, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habit: HabitSummary,
    pub day: String,
    pub day_status: CompletionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Number of days with a recorded status
    pub recorded_days: usize,
}

/// Read-only snapshot; works for habits in any lifecycle status
pub fn habit_status<S: HabitStorage>(
    storage: &S,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let habit = load_habit(storage, &params.habit_id)?;
    let at = parse_day_arg(params.date.as_deref())?;

    Ok(StatusResponse {
        day: day_key(at).to_string(),
        day_status: habit.completion_status(at),
        progress: habit.quantity().map(|_| habit.progress(at)),
        recorded_days: habit.completion_records().len(),
        habit: HabitSummary::from_habit(&habit),
    })
}
