//! Tool for listing habits

use serde::Serialize;

use crate::domain::HabitStatus;
use crate::storage::HabitStorage;
use crate::tools::{HabitSummary, ToolError};

/// Parameters for listing habits
#[derive(Debug, Default)]
pub struct ListParams {
    /// Only habits in this lifecycle status; all habits when omitted
    pub status: Option<HabitStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub total: usize,
    pub message: String,
}

pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListParams,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = storage.list_habits(params.status)?;
    let total = habits.len();

    let message = match (total, params.status) {
        (0, None) => "No habits yet. Create one to start tracking!".to_string(),
        (0, Some(status)) => format!("No {} habits", status),
        (n, None) => format!("Found {} habit{}", n, if n == 1 { "" } else { "s" }),
        (n, Some(status)) => {
            format!("Found {} {} habit{}", n, status, if n == 1 { "" } else { "s" })
        }
    };

    Ok(ListHabitsResponse {
        habits: habits.iter().map(HabitSummary::from_habit).collect(),
        total,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_empty_list() {
        let storage = MemoryStorage::new();
        let response = list_habits(&storage, ListParams::default()).unwrap();
        assert_eq!(response.total, 0);
        assert!(response.habits.is_empty());

        let response = list_habits(
            &storage,
            ListParams {
                status: Some(HabitStatus::Inactive),
            },
        )
        .unwrap();
        assert_eq!(response.message, "No inactive habits");
    }
}
