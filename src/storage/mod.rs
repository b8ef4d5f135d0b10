//! Storage layer for persisting habit data
//!
//! This module defines the persistence contract the rest of the crate relies
//! on, the record format habits are stored as, and two implementations: a
//! SQLite database and an in-memory map used by tests.

pub mod memory;
pub mod migrations;
pub mod record;
pub mod sqlite;

// Re-export the main storage types
pub use memory::MemoryStorage;
pub use record::{HabitRecord, QuantityRecord, ScheduleRecord};
pub use sqlite::SqliteStorage;

use thiserror::Error;

use crate::domain::{DomainError, Habit, HabitId, HabitStatus};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Habit with id {habit_id} already exists")]
    AlreadyExists { habit_id: String },

    #[error("Corrupt habit record: {0}")]
    CorruptRecord(String),

    #[error("Stored habit failed validation: {0}")]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Implementations hand back copies: a habit returned by `find_habit` shares
/// nothing with the stored state, and changes only land through
/// `update_habit`.
pub trait HabitStorage {
    /// Store a new habit, failing if one with the same id exists
    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError>;

    /// Replace a stored habit, failing if it does not exist
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Remove a habit; returns whether anything was deleted
    fn delete_habit(&self, habit_id: &HabitId) -> Result<bool, StorageError>;

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError>;

    /// List habits, optionally only those in one lifecycle status
    fn list_habits(&self, status: Option<HabitStatus>) -> Result<Vec<Habit>, StorageError>;
}
