//! Core types and enums used throughout the domain layer
//!
//! This module defines the identifier wrappers and the small closed enums
//! (kind, lifecycle status, per-day completion status, target type) that the
//! habit entity and its value objects are built from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a cue ID where a habit ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier generated for every cue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CueId(pub Uuid);

impl CueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two kinds of habit the tracker knows about
///
/// A completion habit is marked done/missed explicitly each day, a measured
/// habit accumulates an amount and has its daily outcome derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Completion,
    Measured,
}

impl HabitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Completion => "completion",
            HabitKind::Measured => "measured",
        }
    }
}

impl fmt::Display for HabitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completion" => Ok(HabitKind::Completion),
            "measured" => Ok(HabitKind::Measured),
            other => Err(format!("unknown habit kind '{}'", other)),
        }
    }
}

/// Lifecycle state of a habit
///
/// Only active habits accept per-day writes. Archiving is one-way except
/// through an explicit unarchive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Active,
    Inactive,
    Archived,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Inactive => "inactive",
            HabitStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(HabitStatus::Active),
            "inactive" => Ok(HabitStatus::Inactive),
            "archived" => Ok(HabitStatus::Archived),
            other => Err(format!("unknown habit status '{}'", other)),
        }
    }
}

/// Outcome recorded for a habit on one calendar day
///
/// `Pending` is what a day reads as when nothing has been recorded for it.
/// `Committed` only appears on measured habits that have progress below a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
    Missed,
    Skipped,
    Pending,
    Committed,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "completed",
            CompletionStatus::Missed => "missed",
            CompletionStatus::Skipped => "skipped",
            CompletionStatus::Pending => "pending",
            CompletionStatus::Committed => "committed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(CompletionStatus::Completed),
            "missed" => Ok(CompletionStatus::Missed),
            "skipped" => Ok(CompletionStatus::Skipped),
            "pending" => Ok(CompletionStatus::Pending),
            "committed" => Ok(CompletionStatus::Committed),
            other => Err(format!("unknown completion status '{}'", other)),
        }
    }
}

/// How a measured habit's target is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Reaching at least the target amount is a success
    Goal,
    /// Staying below the target amount is a success
    Limit,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Goal => "goal",
            TargetType::Limit => "limit",
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal" => Ok(TargetType::Goal),
            "limit" => Ok(TargetType::Limit),
            other => Err(format!("unknown target type '{}'", other)),
        }
    }
}

/// Calendar day a timestamp belongs to, truncated in UTC
///
/// Every per-day record is keyed by this value, so two timestamps on the same
/// UTC date always address the same record regardless of time of day.
pub fn day_key(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}
