/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - create/update payloads
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::{Priority, TaskField, TaskStatus};
use super::models::TaskRecord;

/// Locally editable copy of a task, held as raw input values
///
/// Serialized as-is for `POST /tasks` and `PUT /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub description: String,
    pub due_date: String,
    pub reminder: String,
    pub priority: String,
    pub status: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            due_date: String::new(),
            reminder: String::new(),
            priority: Priority::default().as_str().to_string(),
            status: TaskStatus::default().as_str().to_string(),
        }
    }
}

impl TaskDraft {
    /// Build a draft from a server record
    ///
    /// Absent dates become empty strings; absent priority/status take the form defaults.
    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            description: record.description.clone(),
            due_date: record.due_date.clone().unwrap_or_default(),
            reminder: record.reminder.clone().unwrap_or_default(),
            priority: record.priority.unwrap_or_default().as_str().to_string(),
            status: record.status.unwrap_or_default().as_str().to_string(),
        }
    }

    pub fn field(&self, field: TaskField) -> &str {
        match field {
            TaskField::Description => &self.description,
            TaskField::DueDate => &self.due_date,
            TaskField::Reminder => &self.reminder,
            TaskField::Priority => &self.priority,
            TaskField::Status => &self.status,
        }
    }

    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) {
        let slot = match field {
            TaskField::Description => &mut self.description,
            TaskField::DueDate => &mut self.due_date,
            TaskField::Reminder => &mut self.reminder,
            TaskField::Priority => &mut self.priority,
            TaskField::Status => &mut self.status,
        };
        *slot = value.into();
    }
}
