//! Validation of create-habit payloads
//!
//! Turns an untyped JSON payload into construction props for a completion or
//! a measured habit, or into a list of field-level errors. All problems are
//! collected rather than stopping at the first one. The habit factories still
//! re-check everything when the props are used.

use chrono::{DateTime, Utc, Weekday};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{
    parse_weekday_name, CompletionHabitProps, FrequencyInterval, MeasuredHabitProps,
    QuantityProps, ScheduleProps, TargetType,
};

/// One problem with one field, addressed by a dotted path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A payload that passed validation, ready for the matching factory
#[derive(Debug, Clone, PartialEq)]
pub enum CreateHabitPayload {
    Completion(CompletionHabitProps),
    Measured(MeasuredHabitProps),
}

/// Validate a create-habit payload
///
/// Expected shape (camelCase keys):
/// `{ type, name, description, schedule: { startDate, endDate?, interval,
/// daysOfWeek? }, cue?, noteName?, quantity? }` where `quantity` is required
/// for measured habits and `noteName` only applies to completion habits.
pub fn validate_create_payload(payload: &Value) -> Result<CreateHabitPayload, Vec<FieldError>> {
    let obj = payload
        .as_object()
        .ok_or_else(|| vec![FieldError::new("", expected("object", payload))])?;

    let kind = match obj.get("type").and_then(Value::as_str) {
        Some("completion") => "completion",
        Some("measured") => "measured",
        _ => {
            return Err(vec![FieldError::new(
                "type",
                "Invalid discriminator value. Expected 'completion' | 'measured'",
            )])
        }
    };

    let mut errors = Vec::new();

    let name = required_str(obj, "name", "name", &mut errors).and_then(|name| {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            errors.push(FieldError::new("name", "Habit name cannot be empty"));
            None
        } else {
            Some(trimmed.to_string())
        }
    });
    let description = required_str(obj, "description", "description", &mut errors);
    let schedule = validate_schedule(obj.get("schedule"), &mut errors);
    let cue = optional_trimmed(obj, "cue", "Cue description cannot be empty", &mut errors);

    let variant = if kind == "completion" {
        let note_name = optional_trimmed(
            obj,
            "noteName",
            "Note name cannot be empty",
            &mut errors,
        );
        Variant::Completion { note_name }
    } else {
        Variant::Measured {
            quantity: validate_quantity(obj.get("quantity"), &mut errors),
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every field below was checked above; a missing one means an error was pushed
    match (name, description, schedule, variant) {
        (Some(name), Some(description), Some(schedule), Variant::Completion { note_name }) => {
            Ok(CreateHabitPayload::Completion(CompletionHabitProps {
                name,
                description: description.to_string(),
                schedule: Some(schedule),
                cue,
                note_name,
            }))
        }
        (
            Some(name),
            Some(description),
            Some(schedule),
            Variant::Measured {
                quantity: Some(quantity),
            },
        ) => Ok(CreateHabitPayload::Measured(MeasuredHabitProps {
            name,
            description: description.to_string(),
            quantity,
            schedule: Some(schedule),
            cue,
        })),
        _ => Err(vec![FieldError::new("", "Payload is incomplete")]),
    }
}

enum Variant {
    Completion { note_name: Option<String> },
    Measured { quantity: Option<QuantityProps> },
}

fn validate_schedule(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<ScheduleProps> {
    let obj = match value {
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            errors.push(FieldError::new("schedule", expected("object", other)));
            return None;
        }
        None => {
            errors.push(FieldError::new("schedule", "Required"));
            return None;
        }
    };
    let before = errors.len();

    let start_date = required_str(obj, "startDate", "schedule.startDate", errors).and_then(|raw| {
        parse_datetime(raw).or_else(|| {
            errors.push(FieldError::new(
                "schedule.startDate",
                "Start date must be a valid ISO 8601 datetime",
            ));
            None
        })
    });

    let end_date = match obj.get("endDate") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => {
            let parsed = parse_datetime(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "schedule.endDate",
                    "End date must be a valid ISO 8601 datetime",
                ));
            }
            parsed
        }
        Some(other) => {
            errors.push(FieldError::new("schedule.endDate", expected("string", other)));
            None
        }
    };

    let interval = required_str(obj, "interval", "schedule.interval", errors).and_then(|raw| {
        raw.parse::<FrequencyInterval>().ok().or_else(|| {
            errors.push(FieldError::new(
                "schedule.interval",
                format!(
                    "Invalid enum value. Expected 'daily' | 'weekly' | 'custom', received '{}'",
                    raw
                ),
            ));
            None
        })
    });

    let days_of_week = match obj.get("daysOfWeek") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let mut days: Vec<Weekday> = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item.as_str().and_then(parse_weekday_name) {
                    Some(day) => days.push(day),
                    None => errors.push(FieldError::new(
                        format!("schedule.daysOfWeek.{}", index),
                        "Invalid enum value. Expected a weekday name such as 'Monday'",
                    )),
                }
            }
            Some(days)
        }
        Some(other) => {
            errors.push(FieldError::new("schedule.daysOfWeek", expected("array", other)));
            None
        }
    };

    // Cross-field rules only run once the individual fields are valid
    if errors.len() > before {
        return None;
    }
    let (start_date, interval) = (start_date?, interval?);

    if interval.requires_days() && days_of_week.as_ref().map_or(true, Vec::is_empty) {
        errors.push(FieldError::new(
            "schedule.daysOfWeek",
            "Days of week must be provided for weekly or custom frequency intervals",
        ));
    }
    if let Some(end) = end_date {
        if end <= start_date {
            errors.push(FieldError::new(
                "schedule.endDate",
                "End date must be after start date",
            ));
        }
    }
    if errors.len() > before {
        return None;
    }

    Some(ScheduleProps {
        start_date,
        end_date,
        interval,
        days_of_week,
    })
}

fn validate_quantity(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<QuantityProps> {
    let obj = match value {
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            errors.push(FieldError::new("quantity", expected("object", other)));
            return None;
        }
        None => {
            errors.push(FieldError::new("quantity", "Required"));
            return None;
        }
    };

    let amount = match obj.get("amount") {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(amount) if amount > 0.0 => Some(amount),
            _ => {
                errors.push(FieldError::new(
                    "quantity.amount",
                    "Amount must be greater than zero",
                ));
                None
            }
        },
        Some(other) => {
            errors.push(FieldError::new("quantity.amount", expected("number", other)));
            None
        }
        None => {
            errors.push(FieldError::new("quantity.amount", "Required"));
            None
        }
    };

    let unit = required_str(obj, "unit", "quantity.unit", errors).and_then(|unit| {
        let trimmed = unit.trim();
        if trimmed.is_empty() {
            errors.push(FieldError::new("quantity.unit", "Unit cannot be empty"));
            None
        } else {
            Some(trimmed.to_string())
        }
    });

    let target_type = required_str(obj, "targetType", "quantity.targetType", errors).and_then(|raw| {
        raw.parse::<TargetType>().ok().or_else(|| {
            errors.push(FieldError::new(
                "quantity.targetType",
                format!(
                    "Invalid enum value. Expected 'goal' | 'limit', received '{}'",
                    raw
                ),
            ));
            None
        })
    });

    Some(QuantityProps {
        amount: amount?,
        unit: unit?,
        target_type: target_type?,
    })
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.push(FieldError::new(field, expected("string", other)));
            None
        }
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
    }
}

/// Optional string that must not be blank when present; `null` counts as absent
fn optional_trimmed(
    obj: &Map<String, Value>,
    key: &str,
    blank_message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(key, blank_message));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => {
            errors.push(FieldError::new(key, expected("string", other)));
            None
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn expected(wanted: &str, received: &Value) -> String {
    let received = match received {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("Expected {}, received {}", wanted, received)
}
