/// Public library interface for the habit tracker
///
/// The `domain` module holds the habit entity and its value objects,
/// `storage` persists habits, and `tools` wraps both into request handlers
/// used by the command-line binary.

use std::path::PathBuf;
use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod tools;

pub use domain::*;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors surfaced to the binary
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("{0}")]
    Tool(#[from] tools::ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A habit tracker backed by a SQLite database
pub struct HabitTracker {
    storage: SqliteStorage,
}

impl HabitTracker {
    /// Open the tracker at the given database path, creating the schema if needed
    pub fn open(db_path: PathBuf) -> Result<Self, TrackerError> {
        tracing::info!("Opening habit tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        tracing::info!("Found {} existing habits", storage.habit_count()?);

        Ok(Self { storage })
    }

    pub fn in_memory() -> Result<Self, TrackerError> {
        Ok(Self {
            storage: SqliteStorage::open_in_memory()?,
        })
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}
