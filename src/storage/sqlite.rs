//! SQLite implementation of the habit storage interface
//!
//! This module provides the concrete SQLite implementation for storing
//! and retrieving habits. A habit is one row in `habits` plus one row per
//! recorded day in `habit_days`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{CompletionStatus, Habit, HabitId, HabitKind, HabitStatus};
use crate::storage::{
    migrations, HabitRecord, HabitStorage, QuantityRecord, ScheduleRecord, StorageError,
};

const HABIT_COLUMNS: &str = "id, name, description, kind, status, start_date, end_date, \
     frequency_interval, days_of_week, cue, note_name, target_amount, unit, target_type";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

/// Raw column values of a `habits` row before parsing
struct HabitRow {
    id: String,
    name: String,
    description: String,
    kind: String,
    status: String,
    start_date: String,
    end_date: Option<String>,
    interval: String,
    days_of_week: Option<String>,
    cue: Option<String>,
    note_name: Option<String>,
    target_amount: Option<f64>,
    unit: Option<String>,
    target_type: Option<String>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Connection(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::from_connection(conn)
    }

    /// Number of stored habits, counted without loading them
    pub fn habit_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Day rows are removed together with their habit
        conn.execute("PRAGMA foreign_keys = ON", []).map_err(|e| {
            StorageError::Connection(format!("Failed to enable foreign keys: {}", e))
        })?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<HabitRow> {
        Ok(HabitRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            kind: row.get(3)?,
            status: row.get(4)?,
            start_date: row.get(5)?,
            end_date: row.get(6)?,
            interval: row.get(7)?,
            days_of_week: row.get(8)?,
            cue: row.get(9)?,
            note_name: row.get(10)?,
            target_amount: row.get(11)?,
            unit: row.get(12)?,
            target_type: row.get(13)?,
        })
    }

    /// Turn a raw row plus its day rows into a record
    fn load_record(&self, row: HabitRow) -> Result<HabitRecord, StorageError> {
        let id = HabitId::from_string(&row.id)
            .map_err(|_| StorageError::CorruptRecord(format!("invalid habit id '{}'", row.id)))?;
        let kind: HabitKind = row.kind.parse().map_err(StorageError::CorruptRecord)?;
        let status: HabitStatus = row.status.parse().map_err(StorageError::CorruptRecord)?;

        let days_of_week = row
            .days_of_week
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()?;

        let quantity = match (row.target_amount, row.unit, row.target_type) {
            (Some(amount), Some(unit), Some(target_type)) => Some(QuantityRecord {
                amount,
                unit,
                target_type: target_type.parse().map_err(StorageError::CorruptRecord)?,
            }),
            _ => None,
        };

        let (completion_records, progress_records) = self.load_days(&row.id)?;

        Ok(HabitRecord {
            id,
            name: row.name,
            description: row.description,
            kind,
            status,
            schedule: ScheduleRecord {
                start_date: parse_timestamp(&row.start_date)?,
                end_date: row.end_date.as_deref().map(parse_timestamp).transpose()?,
                interval: row.interval.parse().map_err(StorageError::CorruptRecord)?,
                days_of_week,
            },
            cue: row.cue,
            note_name: row.note_name,
            quantity,
            completion_records,
            progress_records,
        })
    }

    #[allow(clippy::type_complexity)]
    fn load_days(
        &self,
        habit_id: &str,
    ) -> Result<(BTreeMap<NaiveDate, CompletionStatus>, BTreeMap<NaiveDate, f64>), StorageError>
    {
        let mut stmt = self.conn.prepare(
            "SELECT day, status, progress FROM habit_days WHERE habit_id = ?1 ORDER BY day",
        )?;

        let rows = stmt.query_map(params![habit_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })?;

        let mut completion_records = BTreeMap::new();
        let mut progress_records = BTreeMap::new();
        for row in rows {
            let (day_str, status, progress) = row?;
            let day = NaiveDate::parse_from_str(&day_str, "%Y-%m-%d")
                .map_err(|_| StorageError::CorruptRecord(format!("invalid day '{}'", day_str)))?;

            if let Some(status) = status {
                let status: CompletionStatus =
                    status.parse().map_err(StorageError::CorruptRecord)?;
                completion_records.insert(day, status);
            }
            if let Some(progress) = progress {
                progress_records.insert(day, progress);
            }
        }

        Ok((completion_records, progress_records))
    }

    fn insert_days(conn: &Connection, record: &HabitRecord) -> Result<(), StorageError> {
        let days: BTreeSet<&NaiveDate> = record
            .completion_records
            .keys()
            .chain(record.progress_records.keys())
            .collect();

        let mut stmt = conn.prepare(
            "INSERT INTO habit_days (habit_id, day, status, progress) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for day in days {
            stmt.execute(params![
                record.id.to_string(),
                day.to_string(),
                record.completion_records.get(day).map(|s| s.as_str()),
                record.progress_records.get(day),
            ])?;
        }

        Ok(())
    }

    fn exists_in(conn: &Connection, habit_id: &HabitId) -> Result<bool, StorageError> {
        let found = conn
            .query_row(
                "SELECT 1 FROM habits WHERE id = ?1",
                params![habit_id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl HabitStorage for SqliteStorage {
    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let record = HabitRecord::from_habit(habit);
        let days_json = record
            .schedule
            .days_of_week
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        if Self::exists_in(&tx, &record.id)? {
            return Err(StorageError::AlreadyExists {
                habit_id: record.id.to_string(),
            });
        }

        tx.execute(
            &format!(
                "INSERT INTO habits ({}, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
                HABIT_COLUMNS
            ),
            params![
                record.id.to_string(),
                record.name,
                record.description,
                record.kind.as_str(),
                record.status.as_str(),
                record.schedule.start_date.to_rfc3339(),
                record.schedule.end_date.map(|d| d.to_rfc3339()),
                record.schedule.interval.as_str(),
                days_json,
                record.cue,
                record.note_name,
                record.quantity.as_ref().map(|q| q.amount),
                record.quantity.as_ref().map(|q| q.unit.as_str()),
                record.quantity.as_ref().map(|q| q.target_type.as_str()),
                now
            ],
        )?;
        Self::insert_days(&tx, &record)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", record.name, record.id);
        Ok(())
    }

    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.to_string()],
                Self::read_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(self.load_record(row)?.into_habit()?)),
            None => Ok(None),
        }
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let record = HabitRecord::from_habit(habit);
        let days_json = record
            .schedule
            .days_of_week
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self.conn.unchecked_transaction()?;
        let rows_affected = tx.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                status = ?4,
                start_date = ?5,
                end_date = ?6,
                frequency_interval = ?7,
                days_of_week = ?8,
                cue = ?9,
                note_name = ?10,
                target_amount = ?11,
                unit = ?12,
                target_type = ?13,
                updated_at = ?14
             WHERE id = ?1",
            params![
                record.id.to_string(),
                record.name,
                record.description,
                record.status.as_str(),
                record.schedule.start_date.to_rfc3339(),
                record.schedule.end_date.map(|d| d.to_rfc3339()),
                record.schedule.interval.as_str(),
                days_json,
                record.cue,
                record.note_name,
                record.quantity.as_ref().map(|q| q.amount),
                record.quantity.as_ref().map(|q| q.unit.as_str()),
                record.quantity.as_ref().map(|q| q.target_type.as_str()),
                Utc::now().to_rfc3339()
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: record.id.to_string(),
            });
        }

        // Day rows are rewritten wholesale so removed days disappear too
        tx.execute(
            "DELETE FROM habit_days WHERE habit_id = ?1",
            params![record.id.to_string()],
        )?;
        Self::insert_days(&tx, &record)?;
        tx.commit()?;

        tracing::debug!("Updated habit: {} ({})", record.name, record.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected > 0 {
            tracing::debug!("Deleted habit: {}", habit_id);
        }
        Ok(rows_affected > 0)
    }

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        Self::exists_in(&self.conn, habit_id)
    }

    fn list_habits(&self, status: Option<HabitStatus>) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);
        if status.is_some() {
            sql.push_str(" WHERE status = ?1");
        }
        sql.push_str(" ORDER BY created_at, name");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match status {
            Some(status) => stmt.query_map(params![status.as_str()], Self::read_row)?,
            None => stmt.query_map([], Self::read_row)?,
        }
        .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| self.load_record(row)?.into_habit())
            .collect()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| StorageError::CorruptRecord(format!("invalid timestamp '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CompletionHabitProps, FrequencyInterval, MeasuredHabitProps, QuantityProps, ScheduleProps,
        TargetType,
    };
    use chrono::{TimeZone, Weekday};

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, d, 18, 45, 0).unwrap()
    }

    fn completion_habit() -> Habit {
        Habit::completion(CompletionHabitProps {
            name: "Meditate".to_string(),
            description: "Ten minutes of breathing".to_string(),
            schedule: Some(ScheduleProps {
                start_date: at(1),
                end_date: Some(at(30)),
                interval: FrequencyInterval::Custom,
                days_of_week: Some(vec![Weekday::Tue, Weekday::Sat]),
            }),
            cue: Some("After brushing teeth".to_string()),
            note_name: Some("Meditation".to_string()),
        })
        .unwrap()
    }

    fn measured_habit() -> Habit {
        Habit::measured(MeasuredHabitProps {
            name: "Run".to_string(),
            description: String::new(),
            quantity: QuantityProps {
                amount: 5.0,
                unit: "km".to_string(),
                target_type: TargetType::Goal,
            },
            schedule: Some(ScheduleProps::daily(at(1))),
            cue: None,
        })
        .unwrap()
    }

    #[test]
    fn test_round_trip_completion_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = completion_habit();
        habit.mark_completed(at(2)).unwrap();
        habit.mark_missed(at(6)).unwrap();
        habit.mark_skipped(at(9)).unwrap();

        storage.save_habit(&habit).unwrap();
        let loaded = storage.find_habit(habit.id()).unwrap().unwrap();

        assert_eq!(loaded, habit);
        assert_eq!(loaded.completion_status(at(6)), CompletionStatus::Missed);
    }

    #[test]
    fn test_round_trip_measured_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = measured_habit();
        habit.add_progress(at(2), 2.5).unwrap();
        habit.add_progress(at(3), 6.0).unwrap();
        habit.mark_skipped(at(4)).unwrap();

        storage.save_habit(&habit).unwrap();
        let loaded = storage.find_habit(habit.id()).unwrap().unwrap();

        assert_eq!(loaded, habit);
        assert_eq!(loaded.progress(at(2)), 2.5);
        assert_eq!(loaded.completion_status(at(3)), CompletionStatus::Completed);
        assert_eq!(loaded.completion_status(at(4)), CompletionStatus::Skipped);
    }

    #[test]
    fn test_save_duplicate_id_fails() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let habit = completion_habit();

        storage.save_habit(&habit).unwrap();
        assert!(matches!(
            storage.save_habit(&habit),
            Err(StorageError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_update_rewrites_days_and_status() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = measured_habit();
        habit.add_progress(at(2), 1.0).unwrap();
        storage.save_habit(&habit).unwrap();

        habit.add_progress(at(2), 4.0).unwrap();
        habit.deactivate().unwrap();
        storage.update_habit(&habit).unwrap();

        let loaded = storage.find_habit(habit.id()).unwrap().unwrap();
        assert_eq!(loaded.status(), HabitStatus::Inactive);
        assert_eq!(loaded.progress(at(2)), 5.0);
        assert_eq!(loaded.completion_status(at(2)), CompletionStatus::Completed);
    }

    #[test]
    fn test_update_missing_habit_fails() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(matches!(
            storage.update_habit(&completion_habit()),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_removes_day_rows() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = completion_habit();
        habit.mark_completed(at(2)).unwrap();
        storage.save_habit(&habit).unwrap();

        assert!(storage.habit_exists(habit.id()).unwrap());
        assert!(storage.delete_habit(habit.id()).unwrap());
        assert!(!storage.delete_habit(habit.id()).unwrap());
        assert!(!storage.habit_exists(habit.id()).unwrap());
        assert!(storage.find_habit(habit.id()).unwrap().is_none());

        let orphaned: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM habit_days", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn test_list_habits_by_status() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let active = completion_habit();
        let mut archived = measured_habit();
        archived.archive();
        storage.save_habit(&active).unwrap();
        storage.save_habit(&archived).unwrap();

        assert_eq!(storage.list_habits(None).unwrap().len(), 2);

        let listed = storage.list_habits(Some(HabitStatus::Archived)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), archived.id());
    }
}
