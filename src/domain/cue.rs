//! Cue value object: the trigger or reminder that prompts a habit

use crate::domain::{CueId, DomainError};

/// A trigger description attached to a habit (e.g. "After morning coffee")
///
/// Two cues are equal when their descriptions are equal; the generated id is
/// carried along for reference only.
#[derive(Debug, Clone)]
pub struct Cue {
    id: CueId,
    description: String,
}

impl Cue {
    /// Create a cue, trimming the description
    pub fn create(description: &str) -> Result<Self, DomainError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCue);
        }

        Ok(Self {
            id: CueId::new(),
            description: trimmed.to_string(),
        })
    }

    pub fn id(&self) -> &CueId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Cue {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl Eq for Cue {}
