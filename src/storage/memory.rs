//! In-memory implementation of the habit storage interface
//!
//! Keeps serialized-shape records in a map, so every read rebuilds a fresh
//! habit the same way the SQLite adapter does. Handy for tests and for
//! running the tools without a database file.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::{Habit, HabitId, HabitStatus};
use crate::storage::{HabitRecord, HabitStorage, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    habits: RefCell<HashMap<HabitId, HabitRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored habits
    pub fn len(&self) -> usize {
        self.habits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.habits.borrow_mut().clear();
    }
}

impl HabitStorage for MemoryStorage {
    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut habits = self.habits.borrow_mut();
        if habits.contains_key(habit.id()) {
            return Err(StorageError::AlreadyExists {
                habit_id: habit.id().to_string(),
            });
        }

        habits.insert(habit.id().clone(), HabitRecord::from_habit(habit));
        tracing::debug!("Stored habit in memory: {} ({})", habit.name(), habit.id());
        Ok(())
    }

    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        let record = self.habits.borrow().get(habit_id).cloned();
        record.map(HabitRecord::into_habit).transpose()
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut habits = self.habits.borrow_mut();
        match habits.get_mut(habit.id()) {
            Some(stored) => {
                *stored = HabitRecord::from_habit(habit);
                tracing::debug!("Updated habit in memory: {} ({})", habit.name(), habit.id());
                Ok(())
            }
            None => Err(StorageError::HabitNotFound {
                habit_id: habit.id().to_string(),
            }),
        }
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        Ok(self.habits.borrow_mut().remove(habit_id).is_some())
    }

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        Ok(self.habits.borrow().contains_key(habit_id))
    }

    fn list_habits(&self, status: Option<HabitStatus>) -> Result<Vec<Habit>, StorageError> {
        let mut records: Vec<HabitRecord> = self
            .habits
            .borrow()
            .values()
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));

        records.into_iter().map(HabitRecord::into_habit).collect()
    }
}
