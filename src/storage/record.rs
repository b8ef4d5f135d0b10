//! Stored representation of a habit
//!
//! `HabitRecord` is the flat, serializable shape every storage adapter works
//! with. Loading a record runs the habit factories again, so a record that no
//! longer satisfies the domain rules is reported instead of silently loaded.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    parse_weekday_name, weekday_name, CompletionHabitProps, CompletionStatus, FrequencyInterval,
    Habit, HabitId, HabitKind, HabitStatus, HabitVariant, MeasuredHabitProps, QuantityProps,
    ScheduleProps, TargetType,
};
use crate::storage::StorageError;

/// Schedule and frequency, flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub interval: FrequencyInterval,
    /// Full weekday names ("Monday", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRecord {
    pub amount: f64,
    pub unit: String,
    pub target_type: TargetType,
}

/// Everything needed to rebuild a habit exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: HabitId,
    pub name: String,
    pub description: String,
    pub kind: HabitKind,
    pub status: HabitStatus,
    pub schedule: ScheduleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<QuantityRecord>,
    #[serde(default)]
    pub completion_records: BTreeMap<NaiveDate, CompletionStatus>,
    #[serde(default)]
    pub progress_records: BTreeMap<NaiveDate, f64>,
}

impl HabitRecord {
    /// Snapshot a habit; the record owns copies of both day maps
    pub fn from_habit(habit: &Habit) -> Self {
        let schedule = habit.schedule();
        let frequency = schedule.frequency();

        let (quantity, progress_records) = match habit.variant() {
            HabitVariant::Completion => (None, BTreeMap::new()),
            HabitVariant::Measured(state) => (
                Some(QuantityRecord {
                    amount: state.quantity().target_amount(),
                    unit: state.quantity().unit().to_string(),
                    target_type: state.quantity().target_type(),
                }),
                state.progress_records().clone(),
            ),
        };

        Self {
            id: habit.id().clone(),
            name: habit.name().to_string(),
            description: habit.description().to_string(),
            kind: habit.kind(),
            status: habit.status(),
            schedule: ScheduleRecord {
                start_date: schedule.start_date(),
                end_date: schedule.end_date(),
                interval: frequency.interval(),
                days_of_week: frequency
                    .days_of_week()
                    .map(|days| days.iter().map(|d| weekday_name(*d).to_string()).collect()),
            },
            cue: habit.cue().map(|cue| cue.description().to_string()),
            note_name: habit.note_name().map(str::to_string),
            quantity,
            completion_records: habit.completion_records().clone(),
            progress_records,
        }
    }

    /// Rebuild the habit through its factory, then restore id, status and day maps
    pub fn into_habit(self) -> Result<Habit, StorageError> {
        let schedule = self.schedule_props()?;

        let habit = match self.kind {
            HabitKind::Completion => Habit::completion(CompletionHabitProps {
                name: self.name,
                description: self.description,
                schedule: Some(schedule),
                cue: self.cue,
                note_name: self.note_name,
            })?,
            HabitKind::Measured => {
                let quantity = self.quantity.ok_or_else(|| {
                    StorageError::CorruptRecord(format!(
                        "measured habit {} has no quantity",
                        self.id
                    ))
                })?;

                Habit::measured(MeasuredHabitProps {
                    name: self.name,
                    description: self.description,
                    quantity: QuantityProps {
                        amount: quantity.amount,
                        unit: quantity.unit,
                        target_type: quantity.target_type,
                    },
                    schedule: Some(schedule),
                    cue: self.cue,
                })?
            }
        };

        Ok(habit.with_persisted_state(
            self.id,
            self.status,
            self.completion_records,
            self.progress_records,
        ))
    }

    fn schedule_props(&self) -> Result<ScheduleProps, StorageError> {
        let days_of_week = match &self.schedule.days_of_week {
            Some(names) => Some(
                names
                    .iter()
                    .map(|name| {
                        parse_weekday_name(name).ok_or_else(|| {
                            StorageError::CorruptRecord(format!("unknown weekday '{}'", name))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(ScheduleProps {
            start_date: self.schedule.start_date,
            end_date: self.schedule.end_date,
            interval: self.schedule.interval,
            days_of_week,
        })
    }
}
