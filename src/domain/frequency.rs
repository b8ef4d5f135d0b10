//! Frequency value object
//!
//! Describes how often a habit is meant to happen. Weekly and custom
//! frequencies name the weekdays they fall on; daily ones never do.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Repetition interval of a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyInterval {
    Daily,
    Weekly,
    Custom,
}

impl FrequencyInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyInterval::Daily => "daily",
            FrequencyInterval::Weekly => "weekly",
            FrequencyInterval::Custom => "custom",
        }
    }

    /// Whether this interval has to name its days of the week
    pub fn requires_days(&self) -> bool {
        matches!(self, FrequencyInterval::Weekly | FrequencyInterval::Custom)
    }
}

impl fmt::Display for FrequencyInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(FrequencyInterval::Daily),
            "weekly" => Ok(FrequencyInterval::Weekly),
            "custom" => Ok(FrequencyInterval::Custom),
            other => Err(format!("unknown frequency interval '{}'", other)),
        }
    }
}

/// How often a habit should be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    interval: FrequencyInterval,
    days_of_week: Option<Vec<Weekday>>,
}

impl Frequency {
    /// Create a frequency, validating the days for weekly and custom intervals
    ///
    /// Repeated weekdays collapse to their first occurrence. Days passed with a
    /// daily interval are dropped.
    pub fn create(
        interval: FrequencyInterval,
        days_of_week: Option<Vec<Weekday>>,
    ) -> Result<Self, DomainError> {
        if !interval.requires_days() {
            return Ok(Self {
                interval,
                days_of_week: None,
            });
        }

        let days = match days_of_week {
            Some(days) if !days.is_empty() => days,
            _ => {
                return Err(DomainError::InvalidFrequency(
                    "Days of week must be provided for weekly and custom frequency".to_string(),
                ))
            }
        };

        let mut unique = Vec::with_capacity(days.len());
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }

        Ok(Self {
            interval,
            days_of_week: Some(unique),
        })
    }

    pub fn interval(&self) -> FrequencyInterval {
        self.interval
    }

    pub fn days_of_week(&self) -> Option<&[Weekday]> {
        self.days_of_week.as_deref()
    }
}

/// Full English name of a weekday ("Monday", ...), as used in payloads and records
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full English weekday name, case-sensitive
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    match name {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
