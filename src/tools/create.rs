//! Tool for creating new habits

use serde::Serialize;
use serde_json::Value;

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::{validate_create_payload, CreateHabitPayload, HabitSummary, ToolError};

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit: HabitSummary,
    pub message: String,
}

/// Validate a raw payload, build the habit and store it
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    payload: &Value,
) -> Result<CreateHabitResponse, ToolError> {
    let validated = validate_create_payload(payload).map_err(|errors| {
        tracing::warn!("Rejected create-habit payload with {} field error(s)", errors.len());
        ToolError::Validation(errors)
    })?;

    let habit = match validated {
        CreateHabitPayload::Completion(props) => Habit::completion(props)?,
        CreateHabitPayload::Measured(props) => Habit::measured(props)?,
    };

    storage.save_habit(&habit)?;
    tracing::info!("Created {} habit '{}' ({})", habit.kind(), habit.name(), habit.id());

    Ok(CreateHabitResponse {
        success: true,
        message: format!("Created habit '{}'", habit.name()),
        habit: HabitSummary::from_habit(&habit),
    })
}
