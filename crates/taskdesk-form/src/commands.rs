/*
[INPUT]:  Store handle, session token, ordered field edits, shutdown token
[OUTPUT]: Saved/invalid/dry-run outcomes driven through the task form
[POS]:    Command layer - headless add/edit/show flows used by the binary
[UPDATE]: When CLI commands or their form interaction change
*/

use std::sync::Arc;

use taskdesk_client::{SessionToken, TaskDraft, TaskField, TaskId, TaskStore, task_path};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::form::{FieldErrors, FormHost, FormMode, SubmitOutcome, TaskFormController};

/// One `field=value` edit applied to the draft
pub type FieldEdit = (TaskField, String);

/// Outcome of an add or edit command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Saved { message: Option<String> },
    Invalid(FieldErrors),
    /// Validation passed; the request that would be sent
    DryRun { method: &'static str, path: String, body: TaskDraft },
}

/// Parse a `field=value` argument; the value may itself contain '='
pub fn parse_assignment(arg: &str) -> std::result::Result<FieldEdit, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{arg}'"))?;
    let field = name.trim().parse::<TaskField>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

/// Shared wiring for one command run
pub struct CommandContext {
    pub store: Arc<dyn TaskStore>,
    pub token: SessionToken,
    pub shutdown: CancellationToken,
}

impl CommandContext {
    fn controller(&self, host: Box<dyn FormHost>) -> TaskFormController {
        TaskFormController::new(Arc::clone(&self.store), host).with_parent_token(&self.shutdown)
    }

    /// Open the form, apply edits in order, then submit (or only validate on dry run)
    pub async fn save(
        &self,
        host: Box<dyn FormHost>,
        task_id: Option<TaskId>,
        edits: &[FieldEdit],
        dry_run: bool,
    ) -> Result<CommandOutcome> {
        let mut form = self.controller(host);
        form.open(task_id, &self.token).await?;

        for (field, value) in edits {
            form.handle_field_change(*field, value.clone())?;
        }

        if dry_run {
            let errors = form.validate();
            if !errors.is_empty() {
                return Ok(CommandOutcome::Invalid(FieldErrors::from_errors(errors)));
            }
            let (method, path) = match form.mode() {
                FormMode::Add => ("POST", "/tasks".to_string()),
                FormMode::Update(id) => ("PUT", task_path(id)?),
            };
            return Ok(CommandOutcome::DryRun {
                method,
                path,
                body: form.draft().clone(),
            });
        }

        match form.submit(&self.token).await? {
            SubmitOutcome::Invalid(errors) => Ok(CommandOutcome::Invalid(errors)),
            SubmitOutcome::Saved(ack) => Ok(CommandOutcome::Saved { message: ack.msg }),
        }
    }

    /// Load a task and return the draft the form would show
    pub async fn show(&self, host: Box<dyn FormHost>, task_id: TaskId) -> Result<TaskDraft> {
        let mut form = self.controller(host);
        form.open(Some(task_id), &self.token).await?;
        Ok(form.draft().clone())
    }
}
