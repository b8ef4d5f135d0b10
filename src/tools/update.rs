//! Tools for changing a habit's lifecycle status, its name, or removing it

use clap::ValueEnum;
use serde::Serialize;

use crate::storage::HabitStorage;
use crate::tools::{load_habit, parse_habit_id, HabitSummary, ToolError};

/// Lifecycle transitions a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LifecycleAction {
    Activate,
    #[value(alias = "pause")]
    Deactivate,
    Archive,
    Unarchive,
}

/// Response from any tool that changes a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub habit: HabitSummary,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub deleted: bool,
    pub message: String,
}

/// Apply a lifecycle transition and store the habit
pub fn change_lifecycle<S: HabitStorage>(
    storage: &S,
    habit_id: &str,
    action: LifecycleAction,
) -> Result<UpdateHabitResponse, ToolError> {
    let mut habit = load_habit(storage, habit_id)?;
    let previous = habit.status();

    let result = match action {
        LifecycleAction::Activate => habit.activate(),
        LifecycleAction::Deactivate => habit.deactivate(),
        LifecycleAction::Archive => {
            habit.archive();
            Ok(())
        }
        LifecycleAction::Unarchive => habit.unarchive(),
    };
    if let Err(e) = result {
        tracing::warn!("Could not apply {:?} to habit {}: {}", action, habit.id(), e);
        return Err(e.into());
    }

    if habit.status() != previous {
        storage.update_habit(&habit)?;
        tracing::info!("Habit {} moved from {} to {}", habit.id(), previous, habit.status());
    }

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("'{}' is now {}", habit.name(), habit.status()),
        habit: HabitSummary::from_habit(&habit),
    })
}

/// Rename a habit
pub fn rename_habit<S: HabitStorage>(
    storage: &S,
    habit_id: &str,
    name: &str,
) -> Result<UpdateHabitResponse, ToolError> {
    let mut habit = load_habit(storage, habit_id)?;
    let previous = habit.name().to_string();

    habit.set_name(name)?;
    storage.update_habit(&habit)?;
    tracing::info!("Renamed habit {} from '{}' to '{}'", habit.id(), previous, habit.name());

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Renamed '{}' to '{}'", previous, habit.name()),
        habit: HabitSummary::from_habit(&habit),
    })
}

/// Remove a habit and all of its day records
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    habit_id: &str,
) -> Result<DeleteHabitResponse, ToolError> {
    let id = parse_habit_id(habit_id)?;
    let deleted = storage.delete_habit(&id)?;

    if deleted {
        tracing::info!("Deleted habit {}", id);
    }

    Ok(DeleteHabitResponse {
        success: true,
        deleted,
        message: if deleted {
            format!("Deleted habit {}", id)
        } else {
            format!("No habit with id {}", id)
        },
    })
}
