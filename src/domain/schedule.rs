//! Schedule value object

use chrono::{DateTime, Utc, Weekday};

use crate::domain::{DomainError, Frequency, FrequencyInterval};

/// When a habit runs: a start, an optional end and a frequency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    frequency: Frequency,
}

impl Schedule {
    /// Create a schedule; the end date, when present, must be strictly after the start
    pub fn create(
        start_date: DateTime<Utc>,
        frequency: Frequency,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if let Some(end) = end_date {
            if end <= start_date {
                return Err(DomainError::InvalidSchedule(
                    "End date must be after start date".to_string(),
                ));
            }
        }

        Ok(Self {
            start_date,
            end_date,
            frequency,
        })
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }
}

/// Unvalidated schedule input handed to the habit factories
///
/// The factories turn this into a [`Frequency`] and a [`Schedule`], so every
/// construction path goes through the same checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleProps {
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub interval: FrequencyInterval,
    pub days_of_week: Option<Vec<Weekday>>,
}

impl ScheduleProps {
    /// Daily schedule starting at `start_date` with no end
    pub fn daily(start_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date: None,
            interval: FrequencyInterval::Daily,
            days_of_week: None,
        }
    }

    pub fn build(self) -> Result<Schedule, DomainError> {
        let frequency = Frequency::create(self.interval, self.days_of_week)?;
        Schedule::create(self.start_date, frequency, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn daily() -> Frequency {
        Frequency::create(FrequencyInterval::Daily, None).unwrap()
    }

    #[test]
    fn test_open_ended_schedule() {
        let schedule = Schedule::create(start(), daily(), None).unwrap();
        assert_eq!(schedule.start_date(), start());
        assert!(schedule.end_date().is_none());
        assert_eq!(schedule.frequency().interval(), FrequencyInterval::Daily);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let result = Schedule::create(start(), daily(), Some(start() - Duration::days(1)));
        assert!(matches!(result, Err(DomainError::InvalidSchedule(_))));
    }

    #[test]
    fn test_end_equal_to_start_rejected() {
        let result = Schedule::create(start(), daily(), Some(start()));
        assert!(matches!(result, Err(DomainError::InvalidSchedule(_))));
    }

    #[test]
    fn test_props_surface_frequency_errors_first() {
        let props = ScheduleProps {
            start_date: start(),
            end_date: Some(start() - Duration::days(3)),
            interval: FrequencyInterval::Weekly,
            days_of_week: None,
        };

        assert!(matches!(props.build(), Err(DomainError::InvalidFrequency(_))));
    }
}
