use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
use habit_tracker::tools;
use habit_tracker::*;
use tempfile::NamedTempFile;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
}

fn weekly_habit() -> Habit {
    Habit::completion(CompletionHabitProps {
        name: "Long run".to_string(),
        description: "Weekend mileage".to_string(),
        schedule: Some(ScheduleProps {
            start_date: start(),
            end_date: Some(start() + Duration::days(90)),
            interval: FrequencyInterval::Weekly,
            days_of_week: Some(vec![Weekday::Sat, Weekday::Sun]),
        }),
        cue: Some("Shoes by the door".to_string()),
        note_name: Some("running-log".to_string()),
    })
    .unwrap()
}

fn limit_habit() -> Habit {
    Habit::measured(MeasuredHabitProps {
        name: "Coffee".to_string(),
        description: String::new(),
        quantity: QuantityProps {
            amount: 2.0,
            unit: "cups".to_string(),
            target_type: TargetType::Limit,
        },
        schedule: Some(ScheduleProps::daily(start())),
        cue: None,
    })
    .unwrap()
}

#[test]
fn test_sqlite_round_trip_survives_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let mut runner = weekly_habit();
    runner.mark_completed(start() + Duration::days(5)).unwrap();
    runner.mark_skipped(start() + Duration::days(6)).unwrap();
    runner.deactivate().unwrap();

    let mut coffee = limit_habit();
    coffee.set_progress(start(), 1.0).unwrap();
    coffee.set_progress(start() + Duration::days(1), 3.5).unwrap();

    {
        let storage = SqliteStorage::new(db_path.clone()).expect("Failed to create storage");
        storage.save_habit(&runner).unwrap();
        storage.save_habit(&coffee).unwrap();
    }

    let storage = SqliteStorage::new(db_path).expect("Failed to reopen storage");

    let loaded = storage.find_habit(runner.id()).unwrap().unwrap();
    assert_eq!(loaded, runner);
    assert_eq!(loaded.status(), HabitStatus::Inactive);
    assert_eq!(loaded.note_name(), Some("running-log"));
    assert_eq!(
        loaded.cue().map(|c| c.description()),
        Some("Shoes by the door")
    );

    let loaded = storage.find_habit(coffee.id()).unwrap().unwrap();
    assert_eq!(loaded.progress(start() + Duration::days(1)), 3.5);
    assert_eq!(
        loaded.completion_status(start() + Duration::days(1)),
        CompletionStatus::Missed
    );
    assert_eq!(loaded.progress_records(), coffee.progress_records());
}

#[test]
fn test_adapters_agree() {
    let sqlite = SqliteStorage::open_in_memory().unwrap();
    let memory = MemoryStorage::new();

    let mut habit = limit_habit();
    habit.add_progress(start(), 0.5).unwrap();

    let adapters: [&dyn HabitStorage; 2] = [&sqlite, &memory];
    for storage in adapters {
        storage.save_habit(&habit).unwrap();
        assert!(matches!(
            storage.save_habit(&habit),
            Err(StorageError::AlreadyExists { .. })
        ));
        assert_eq!(storage.find_habit(habit.id()).unwrap(), Some(habit.clone()));
        assert_eq!(
            storage.list_habits(Some(HabitStatus::Archived)).unwrap().len(),
            0
        );
        assert!(storage.delete_habit(habit.id()).unwrap());
        assert!(!storage.habit_exists(habit.id()).unwrap());
        assert!(matches!(
            storage.update_habit(&habit),
            Err(StorageError::HabitNotFound { .. })
        ));
    }
}

#[test]
fn test_unreadable_row_does_not_block_opening() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let coffee = limit_habit();
    let broken_id = HabitId::new();
    {
        let storage = SqliteStorage::new(db_path.clone()).expect("Failed to create storage");
        storage.save_habit(&coffee).unwrap();
    }
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "INSERT INTO habits (id, name, description, kind, status, start_date,
                frequency_interval, created_at, updated_at)
             VALUES (?1, '  ', '', 'completion', 'active', '2024-06-03T00:00:00+00:00',
                'daily', '2024-06-03T00:00:00+00:00', '2024-06-03T00:00:00+00:00')",
            [broken_id.to_string()],
        )
        .unwrap();
    }

    let tracker = HabitTracker::open(db_path).expect("Failed to open tracker");
    assert_eq!(tracker.storage().habit_count().unwrap(), 2);
    assert!(matches!(
        tracker.storage().find_habit(&broken_id),
        Err(StorageError::Domain(DomainError::EmptyName))
    ));

    let response = tools::delete_habit(tracker.storage(), &broken_id.to_string()).unwrap();
    assert!(response.deleted);
    assert_eq!(tracker.storage().habit_count().unwrap(), 1);
    assert_eq!(tracker.storage().list_habits(None).unwrap(), vec![coffee]);
}
