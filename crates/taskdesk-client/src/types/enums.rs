/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string that does not name any variant of the target enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Editable fields of a task, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Description,
    DueDate,
    Reminder,
    Priority,
    Status,
}

impl TaskField {
    pub const ALL: [TaskField; 5] = [
        TaskField::Description,
        TaskField::DueDate,
        TaskField::Reminder,
        TaskField::Priority,
        TaskField::Status,
    ];

    /// Wire name, identical to the JSON key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Description => "description",
            TaskField::DueDate => "dueDate",
            TaskField::Reminder => "reminder",
            TaskField::Priority => "priority",
            TaskField::Status => "status",
        }
    }
}

macro_rules! wire_enum_traits {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum_traits!(Priority, "priority");
wire_enum_traits!(TaskStatus, "status");
wire_enum_traits!(TaskField, "field");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_defaults() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in-progress""#
        );
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("dueDate".parse::<TaskField>(), Ok(TaskField::DueDate));
        let err = "due_date".parse::<TaskField>().unwrap_err();
        assert_eq!(err.kind, "field");
        assert_eq!(err.to_string(), "unknown field 'due_date'");
    }

    #[test]
    fn test_unknown_priority_rejected() {
        assert!("urgent".parse::<Priority>().is_err());
        assert!("Medium".parse::<Priority>().is_err());
    }
}
