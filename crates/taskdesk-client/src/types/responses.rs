/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - response envelopes
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::TaskRecord;

/// Body of `GET /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: TaskRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// Informational body of a successful create/update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub task: Option<TaskRecord>,
}
