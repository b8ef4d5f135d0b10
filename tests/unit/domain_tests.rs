use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
use habit_tracker::*;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

fn flossing() -> Habit {
    Habit::completion(CompletionHabitProps {
        name: "Floss".to_string(),
        description: "Every evening".to_string(),
        schedule: Some(ScheduleProps::daily(start())),
        cue: Some("After brushing".to_string()),
        note_name: None,
    })
    .unwrap()
}

fn measured(amount: f64, target_type: TargetType) -> Habit {
    Habit::measured(MeasuredHabitProps {
        name: "Tracked".to_string(),
        description: String::new(),
        quantity: QuantityProps {
            amount,
            unit: "units".to_string(),
            target_type,
        },
        schedule: Some(ScheduleProps::daily(start())),
        cue: None,
    })
    .unwrap()
}

#[test]
fn test_new_habits_start_active() {
    assert_eq!(flossing().status(), HabitStatus::Active);
    assert_eq!(measured(1.0, TargetType::Goal).status(), HabitStatus::Active);
}

#[test]
fn test_lifecycle_transitions() {
    let mut habit = flossing();

    habit.archive();
    habit.archive();
    assert_eq!(habit.status(), HabitStatus::Archived);

    assert_eq!(habit.activate().unwrap_err().kind(), ErrorKind::State);
    assert_eq!(habit.deactivate().unwrap_err().kind(), ErrorKind::State);

    habit.unarchive().unwrap();
    assert_eq!(habit.status(), HabitStatus::Active);
    assert_eq!(habit.unarchive(), Err(DomainError::NotArchived));

    habit.deactivate().unwrap();
    habit.deactivate().unwrap();
    assert_eq!(habit.status(), HabitStatus::Inactive);
}

#[test]
fn test_one_mark_per_day() {
    let mut habit = flossing();
    let morning = start() + Duration::days(2) + Duration::hours(7);
    let evening = morning + Duration::hours(13);

    habit.mark_missed(morning).unwrap();
    let err = habit.mark_completed(evening).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(habit.completion_status(evening), CompletionStatus::Missed);

    habit.mark_completed(evening + Duration::hours(5)).unwrap();
    assert_eq!(habit.completion_records().len(), 2);
}

#[test]
fn test_goal_progress() {
    let mut habit = measured(30.0, TargetType::Goal);
    let day = start() + Duration::days(1);

    assert_eq!(habit.progress(day), 0.0);
    habit.add_progress(day, 15.0).unwrap();
    assert_eq!(habit.completion_status(day), CompletionStatus::Committed);
    habit.add_progress(day, 15.0).unwrap();
    assert_eq!(habit.completion_status(day), CompletionStatus::Completed);
}

#[test]
fn test_limit_progress() {
    let mut habit = measured(2.0, TargetType::Limit);
    let day = start() + Duration::days(1);

    habit.set_progress(day, 1.0).unwrap();
    assert_eq!(habit.completion_status(day), CompletionStatus::Completed);
    habit.set_progress(day, 3.0).unwrap();
    assert_eq!(habit.completion_status(day), CompletionStatus::Missed);
}

#[test]
fn test_progress_rejected_on_inactive_habit() {
    let mut habit = measured(2.0, TargetType::Limit);
    habit.deactivate().unwrap();

    let err = habit.add_progress(start(), 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(habit.progress(start()), 0.0);
}

#[test]
fn test_weekly_schedule_requires_days() {
    let result = Habit::completion(CompletionHabitProps {
        name: "Gym".to_string(),
        description: String::new(),
        schedule: Some(ScheduleProps {
            start_date: start(),
            end_date: None,
            interval: FrequencyInterval::Weekly,
            days_of_week: None,
        }),
        cue: None,
        note_name: None,
    });
    assert!(matches!(result, Err(DomainError::InvalidFrequency(_))));

    let habit = Habit::completion(CompletionHabitProps {
        name: "Gym".to_string(),
        description: String::new(),
        schedule: Some(ScheduleProps {
            start_date: start(),
            end_date: None,
            interval: FrequencyInterval::Weekly,
            days_of_week: Some(vec![Weekday::Mon, Weekday::Thu]),
        }),
        cue: None,
        note_name: None,
    })
    .unwrap();
    assert_eq!(
        habit.schedule().frequency().days_of_week(),
        Some(&[Weekday::Mon, Weekday::Thu][..])
    );
}
