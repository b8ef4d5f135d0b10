//! Database migration management
//!
//! This module handles creating and updating the SQLite database schema.
//! It ensures the database has all the required tables and indexes.

use rusqlite::{Connection, OptionalExtension};

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .optional()?
        .unwrap_or(0); // No version row yet means a fresh database

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: habits and their per-day records
///
/// A habit row holds the entity and its value objects. Each row of
/// `habit_days` holds one calendar day: the stored completion status and,
/// for measured habits, the accumulated progress.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            frequency_interval TEXT NOT NULL,
            days_of_week TEXT,
            cue TEXT,
            note_name TEXT,
            target_amount REAL,
            unit TEXT,
            target_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_days (
            habit_id TEXT NOT NULL,
            day TEXT NOT NULL,
            status TEXT,
            progress REAL,
            PRIMARY KEY (habit_id, day),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Listing habits by lifecycle status
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_status
         ON habits (status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_days_day
         ON habit_days (day)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
