/*
[INPUT]:  TaskDraft input values
[OUTPUT]: Ordered field errors and the keyed error map shown by the form
[POS]:    Form domain logic - client-side field rules
[UPDATE]: When field rules or messages change
*/

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use taskdesk_client::{Priority, TaskDraft, TaskField, TaskStatus};

/// One failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: TaskField,
    pub err: String,
}

impl FieldError {
    pub fn new(field: TaskField, err: impl Into<String>) -> Self {
        Self {
            field,
            err: err.into(),
        }
    }
}

/// Pluggable validation policy for task drafts
///
/// Implementations must be deterministic: identical drafts yield identical errors.
pub trait Validator: Send + Sync {
    fn validate(&self, draft: &TaskDraft) -> Vec<FieldError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Required,
    Date,
    DateTime,
    Priority,
    Status,
}

impl Rule {
    fn check(&self, value: &str) -> Option<&'static str> {
        let ok = match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::Date => value.is_empty() || is_date(value),
            Rule::DateTime => value.is_empty() || is_date_time(value),
            Rule::Priority => value.parse::<Priority>().is_ok(),
            Rule::Status => value.parse::<TaskStatus>().is_ok(),
        };
        if ok { None } else { Some(self.message()) }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::Required => "This field is required",
            Rule::Date => "Please enter a valid date",
            Rule::DateTime => "Please enter a valid date and time",
            Rule::Priority => "Please select a valid priority",
            Rule::Status => "Please select a valid status",
        }
    }
}

fn rules_for(field: TaskField) -> &'static [Rule] {
    match field {
        TaskField::Description => &[Rule::Required],
        TaskField::DueDate => &[Rule::Date],
        TaskField::Reminder => &[Rule::DateTime],
        TaskField::Priority => &[Rule::Priority],
        TaskField::Status => &[Rule::Status],
    }
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_date_time(value: &str) -> bool {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Run every field rule against the draft, in form field order
///
/// Only the first failing rule of a field is reported.
pub fn validate_many_fields(draft: &TaskDraft) -> Vec<FieldError> {
    TaskField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = draft.field(field);
            rules_for(field)
                .iter()
                .find_map(|rule| rule.check(value))
                .map(|message| FieldError::new(field, message))
        })
        .collect()
}

/// Built-in task rules
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskRules;

impl Validator for TaskRules {
    fn validate(&self, draft: &TaskDraft) -> Vec<FieldError> {
        validate_many_fields(draft)
    }
}

/// Errors keyed by field, as displayed under each input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<TaskField, String>);

impl FieldErrors {
    /// Fold an ordered error list into a map; a later entry for the same field wins
    pub fn from_errors(errors: impl IntoIterator<Item = FieldError>) -> Self {
        Self(
            errors
                .into_iter()
                .map(|error| (error.field, error.err))
                .collect(),
        )
    }

    pub fn get(&self, field: TaskField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: TaskField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskField, &str)> {
        self.0.iter().map(|(field, err)| (*field, err.as_str()))
    }
}
