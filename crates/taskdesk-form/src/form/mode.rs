/*
[INPUT]:  Optional task id supplied when the form opens
[OUTPUT]: Add/update mode and the labels derived from it
[POS]:    Form domain logic - mode derivation
[UPDATE]: When mode-dependent labels change
*/

use serde::Serialize;
use taskdesk_client::TaskId;

/// Mode-dependent text and controls a view renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormLabels {
    pub title: &'static str,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub shows_reset: bool,
}

/// Whether the form creates a new task or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "task_id", rename_all = "snake_case")]
pub enum FormMode {
    Add,
    Update(TaskId),
}

impl FormMode {
    /// Update iff an id is supplied
    pub fn from_task_id(task_id: Option<TaskId>) -> Self {
        match task_id {
            Some(id) => FormMode::Update(id),
            None => FormMode::Add,
        }
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            FormMode::Add => None,
            FormMode::Update(id) => Some(id),
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, FormMode::Update(_))
    }

    pub fn document_title(&self) -> &'static str {
        match self {
            FormMode::Add => "Add Task",
            FormMode::Update(_) => "Edit Task",
        }
    }

    pub fn labels(&self) -> FormLabels {
        FormLabels {
            title: self.document_title(),
            heading: self.heading(),
            submit_label: self.submit_label(),
            shows_reset: self.shows_reset(),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            FormMode::Add => "Add New Task",
            FormMode::Update(_) => "Edit Task",
        }
    }

    fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Add => "Add Task",
            FormMode::Update(_) => "Update Task",
        }
    }

    /// Reset is only offered as a control when there is a loaded baseline
    fn shows_reset(&self) -> bool {
        self.is_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_task_id() {
        assert_eq!(FormMode::from_task_id(None), FormMode::Add);
        assert_eq!(
            FormMode::from_task_id(Some(TaskId::from("42"))),
            FormMode::Update(TaskId::from("42"))
        );
    }

    #[test]
    fn test_labels() {
        let add = FormMode::Add;
        assert_eq!(add.document_title(), "Add Task");
        assert_eq!(add.heading(), "Add New Task");
        assert_eq!(add.submit_label(), "Add Task");
        assert!(!add.shows_reset());

        let update = FormMode::Update(TaskId::from("1"));
        assert_eq!(update.document_title(), "Edit Task");
        assert_eq!(update.heading(), "Edit Task");
        assert_eq!(update.submit_label(), "Update Task");
        assert!(update.shows_reset());
    }

    #[test]
    fn test_labels_bundle() {
        assert_eq!(
            FormMode::Add.labels(),
            FormLabels {
                title: "Add Task",
                heading: "Add New Task",
                submit_label: "Add Task",
                shows_reset: false,
            }
        );
        assert!(FormMode::Update(TaskId::from("1")).labels().shows_reset);
    }
}
