use habit_tracker::tools::{self, DayMark, LifecycleAction, ListParams, LogDayParams};
use habit_tracker::tools::{ProgressMode, ProgressParams, StatusParams, ToolError};
use habit_tracker::{CompletionStatus, HabitStatus, HabitTracker};
use serde_json::json;
use tempfile::NamedTempFile;

fn create(tracker: &HabitTracker, payload: serde_json::Value) -> String {
    tools::create_habit(tracker.storage(), &payload)
        .expect("Failed to create habit")
        .habit
        .habit_id
}

#[test]
fn test_measured_habit_workflow() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let tracker = HabitTracker::open(temp_file.path().to_path_buf()).expect("Failed to open");

    let habit_id = create(
        &tracker,
        json!({
            "type": "measured",
            "name": "Read",
            "description": "Fiction counts",
            "schedule": { "startDate": "2024-01-01T00:00:00Z", "interval": "daily" },
            "quantity": { "amount": 30, "unit": "minutes", "targetType": "goal" },
            "cue": "After dinner"
        }),
    );

    let progress = |mode, value| ProgressParams {
        habit_id: habit_id.clone(),
        mode,
        value,
        date: Some("2024-01-10".to_string()),
    };

    let first =
        tools::record_progress(tracker.storage(), progress(ProgressMode::Add, 15.0)).unwrap();
    assert_eq!(first.status, CompletionStatus::Committed);
    let second =
        tools::record_progress(tracker.storage(), progress(ProgressMode::Add, 15.0)).unwrap();
    assert_eq!(second.status, CompletionStatus::Completed);

    let negative = tools::record_progress(tracker.storage(), progress(ProgressMode::Set, -1.0));
    assert!(matches!(negative, Err(ToolError::Domain(_))));

    tools::change_lifecycle(tracker.storage(), &habit_id, LifecycleAction::Archive).unwrap();
    let archived_write =
        tools::record_progress(tracker.storage(), progress(ProgressMode::Add, 5.0));
    assert!(matches!(archived_write, Err(ToolError::Domain(_))));

    let status = tools::habit_status(
        tracker.storage(),
        StatusParams {
            habit_id: habit_id.clone(),
            date: Some("2024-01-10".to_string()),
        },
    )
    .unwrap();
    assert_eq!(status.progress, Some(30.0));
    assert_eq!(status.day_status, CompletionStatus::Completed);
    assert_eq!(status.habit.status, "archived");
}

#[test]
fn test_completion_habit_workflow() {
    let tracker = HabitTracker::in_memory().unwrap();

    let habit_id = create(
        &tracker,
        json!({
            "type": "completion",
            "name": "Stretch",
            "description": "",
            "schedule": {
                "startDate": "2024-01-01T00:00:00Z",
                "interval": "custom",
                "daysOfWeek": ["Monday", "Wednesday"]
            },
            "noteName": "mobility"
        }),
    );
    create(
        &tracker,
        json!({
            "type": "completion",
            "name": "Journal",
            "description": "",
            "schedule": { "startDate": "2024-01-01T00:00:00Z", "interval": "daily" }
        }),
    );

    let marked = tools::log_day(
        tracker.storage(),
        LogDayParams {
            habit_id: habit_id.clone(),
            mark: DayMark::Completed,
            date: Some("2024-01-08".to_string()),
        },
    )
    .unwrap();
    assert_eq!(marked.status, CompletionStatus::Completed);

    let duplicate = tools::log_day(
        tracker.storage(),
        LogDayParams {
            habit_id: habit_id.clone(),
            mark: DayMark::Missed,
            date: Some("2024-01-08".to_string()),
        },
    );
    assert!(matches!(duplicate, Err(ToolError::Domain(_))));

    tools::change_lifecycle(tracker.storage(), &habit_id, LifecycleAction::Deactivate).unwrap();
    let inactive = tools::list_habits(
        tracker.storage(),
        ListParams {
            status: Some(HabitStatus::Inactive),
        },
    )
    .unwrap();
    assert_eq!(inactive.total, 1);
    assert_eq!(inactive.habits[0].name, "Stretch");
    assert_eq!(inactive.habits[0].note_name.as_deref(), Some("mobility"));

    let all = tools::list_habits(tracker.storage(), ListParams::default()).unwrap();
    assert_eq!(all.total, 2);

    assert!(tools::delete_habit(tracker.storage(), &habit_id).unwrap().deleted);
    let gone = tools::habit_status(
        tracker.storage(),
        StatusParams {
            habit_id,
            date: None,
        },
    );
    assert!(matches!(gone, Err(ToolError::HabitNotFound(_))));
}

#[test]
fn test_invalid_payload_reports_every_field() {
    let tracker = HabitTracker::in_memory().unwrap();

    let result = tools::create_habit(
        tracker.storage(),
        &json!({
            "type": "measured",
            "name": " ",
            "description": "",
            "schedule": { "startDate": "not a date", "interval": "daily" },
            "quantity": { "amount": 0, "unit": "pages", "targetType": "goal" }
        }),
    );

    match result {
        Err(ToolError::Validation(errors)) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"name"));
            assert!(fields.contains(&"schedule.startDate"));
            assert!(fields.contains(&"quantity.amount"));
        }
        other => panic!("expected validation errors, got {:?}", other),
    }

    let listed = tools::list_habits(tracker.storage(), ListParams::default());
    assert!(matches!(listed, Ok(ref r) if r.total == 0));
}
