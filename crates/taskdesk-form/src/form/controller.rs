/*
[INPUT]:  Task store, host shell, session token, field edits
[OUTPUT]: Draft state, field errors, snapshots and create/update calls
[POS]:    Form layer - add/edit task controller
[UPDATE]: When form operations or their ordering rules change
*/

use std::sync::Arc;

use serde::Serialize;
use taskdesk_client::{
    SaveAck, SessionToken, TaskDraft, TaskField, TaskId, TaskRecord, TaskStore,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FormError, Result};
use crate::form::fetch::{FetchOptions, Fetcher, Notifier};
use crate::form::host::{FormHost, HOME_PATH};
use crate::form::mode::{FormLabels, FormMode};
use crate::form::state_machine::{FormAction, FormPhase, FormStateMachine};
use crate::form::validation::{FieldError, FieldErrors, TaskRules, Validator};

/// Everything a view needs to render the form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub phase: FormPhase,
    /// No further user action is possible
    pub terminal: bool,
    pub mode: FormMode,
    pub labels: FormLabels,
    pub draft: TaskDraft,
    pub errors: FieldErrors,
    pub loading: bool,
}

/// Result of a submit that did not fail at the network layer
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// The store accepted the draft and the host navigated home
    Saved(SaveAck),
}

/// Controller for the add/edit task form
///
/// Owns the draft exclusively. Every network call takes the session token as
/// an explicit argument. Loads race the form's cancellation token, so a form
/// torn down mid-load never sees the late result.
pub struct TaskFormController {
    store: Arc<dyn TaskStore>,
    host: Box<dyn FormHost>,
    validator: Box<dyn Validator>,
    fetcher: Fetcher,
    mode: FormMode,
    machine: FormStateMachine,
    draft: TaskDraft,
    loaded_task: Option<TaskRecord>,
    errors: FieldErrors,
    loading: bool,
    shutdown: CancellationToken,
    snapshots: watch::Sender<FormSnapshot>,
}

impl TaskFormController {
    pub fn new(store: Arc<dyn TaskStore>, host: Box<dyn FormHost>) -> Self {
        let mode = FormMode::Add;
        let draft = TaskDraft::default();
        let (snapshots, _) = watch::channel(FormSnapshot {
            phase: FormPhase::Init,
            terminal: false,
            labels: mode.labels(),
            mode: mode.clone(),
            draft: draft.clone(),
            errors: FieldErrors::default(),
            loading: false,
        });

        Self {
            store,
            host,
            validator: Box::new(TaskRules),
            fetcher: Fetcher::default(),
            mode,
            machine: FormStateMachine::new(),
            draft,
            loaded_task: None,
            errors: FieldErrors::default(),
            loading: false,
            shutdown: CancellationToken::new(),
            snapshots,
        }
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.fetcher = Fetcher::new(notifier);
        self
    }

    /// Tie this form's lifetime to a parent token; cancelling the parent tears the form down
    pub fn with_parent_token(mut self, parent: &CancellationToken) -> Self {
        self.shutdown = parent.child_token();
        self
    }

    /// Set the mode from the optional id and publish the document title
    ///
    /// In add mode the draft is ready immediately; update mode waits for
    /// [`load_existing`](Self::load_existing).
    pub fn initialize(&mut self, task_id: Option<TaskId>) -> Result<()> {
        if !self.machine.can_transition(&FormAction::Open) {
            return Err(self.reject(FormAction::Open));
        }

        self.mode = FormMode::from_task_id(task_id);
        self.host.set_title(self.mode.document_title());
        info!(mode = ?self.mode, "task form initialized");

        if !self.mode.is_update() {
            self.machine.transition(FormAction::Open)?;
        }
        self.publish();
        Ok(())
    }

    /// Initialize, then load when an id is supplied
    pub async fn open(
        &mut self,
        task_id: Option<TaskId>,
        token: &SessionToken,
    ) -> Result<()> {
        self.initialize(task_id)?;
        if self.mode.is_update() {
            self.load_existing(token).await?;
        }
        Ok(())
    }

    /// Fetch the task being edited and seed the draft from it
    ///
    /// Errors are reported through the notifier and leave the form in
    /// [`FormPhase::Failed`]; there is no retry.
    pub async fn load_existing(&mut self, token: &SessionToken) -> Result<()> {
        let task_id = self.mode.task_id().cloned().ok_or(FormError::MissingTaskId)?;
        self.machine.transition(FormAction::BeginLoad)?;
        self.set_loading(true);
        debug!(task_id = %task_id, "loading task");

        let shutdown = self.shutdown.clone();
        let store = Arc::clone(&self.store);
        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            result = self.fetcher.run(
                FetchOptions::quiet_success(),
                store.fetch_task(&task_id, token),
            ) => Some(result),
        };

        self.loading = false;
        match result {
            None => {
                warn!(task_id = %task_id, "form torn down during load; discarding result");
                self.machine.transition(FormAction::Teardown)?;
                self.publish();
                Err(FormError::Cancelled)
            }
            Some(Ok(record)) => {
                self.draft = TaskDraft::from_record(&record);
                self.loaded_task = Some(record);
                self.machine.transition(FormAction::LoadSucceeded)?;
                info!(task_id = %task_id, "task loaded");
                self.publish();
                Ok(())
            }
            Some(Err(err)) => {
                self.machine
                    .transition(FormAction::LoadFailed(err.to_string()))?;
                self.publish();
                Err(err.into())
            }
        }
    }

    /// Set one draft field; no validation, no other field touched
    pub fn handle_field_change(&mut self, field: TaskField, value: impl Into<String>) -> Result<()> {
        self.machine.transition(FormAction::Edit)?;
        self.draft.set_field(field, value);
        self.publish();
        Ok(())
    }

    /// Same as [`handle_field_change`](Self::handle_field_change) with a wire field name
    pub fn handle_named_field_change(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: TaskField = name.parse()?;
        self.handle_field_change(field, value)
    }

    /// Restore the draft to its baseline
    ///
    /// The baseline is the loaded task in update mode and the field defaults in
    /// add mode. Field errors are left untouched until the next submit.
    pub fn handle_reset(&mut self) -> Result<()> {
        self.machine.transition(FormAction::Reset)?;
        self.draft = match &self.loaded_task {
            Some(record) => TaskDraft::from_record(record),
            None => TaskDraft::default(),
        };
        debug!("draft reset");
        self.publish();
        Ok(())
    }

    /// Run the field rules against the current draft
    pub fn validate(&self) -> Vec<FieldError> {
        self.validator.validate(&self.draft)
    }

    /// Validate, then create or update the task and navigate home
    ///
    /// On validation failure the error map is replaced in full and nothing is
    /// sent. On request failure the form returns to READY without navigating.
    pub async fn submit(&mut self, token: &SessionToken) -> Result<SubmitOutcome> {
        if !self.machine.can_transition(&FormAction::Submit) {
            return Err(self.reject(FormAction::Submit));
        }

        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = FieldErrors::from_errors(errors);
            self.machine.transition(FormAction::Reject)?;
            debug!(error_count = self.errors.len(), "submit rejected by validation");
            self.publish();
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        }

        self.errors = FieldErrors::default();
        self.machine.transition(FormAction::Submit)?;
        self.set_loading(true);

        let store = Arc::clone(&self.store);
        let call = async {
            match &self.mode {
                FormMode::Add => store.create_task(&self.draft, token).await,
                FormMode::Update(id) => store.update_task(id, &self.draft, token).await,
            }
        };
        let result = self.fetcher.run(FetchOptions::default(), call).await;

        self.loading = false;
        match result {
            Ok(ack) => {
                self.machine.transition(FormAction::SubmitSucceeded)?;
                info!(mode = ?self.mode, "task saved");
                self.host.navigate(HOME_PATH);
                self.publish();
                Ok(SubmitOutcome::Saved(ack))
            }
            Err(err) => {
                self.machine.transition(FormAction::SubmitFailed)?;
                self.publish();
                Err(err.into())
            }
        }
    }

    /// Leave the form without saving
    pub fn cancel(&mut self) -> Result<()> {
        self.machine.transition(FormAction::Cancel)?;
        self.host.navigate(HOME_PATH);
        self.publish();
        Ok(())
    }

    /// Dispose of the form; an outstanding load will discard its result
    pub fn teardown(&mut self) {
        self.shutdown.cancel();
        if self.machine.transition(FormAction::Teardown).is_ok() {
            debug!("task form torn down");
            self.publish();
        }
    }

    /// Token that tears the form down when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let phase = self.machine.state();
        FormSnapshot {
            phase,
            terminal: phase.is_terminal(),
            mode: self.mode.clone(),
            labels: self.mode.labels(),
            draft: self.draft.clone(),
            errors: self.errors.clone(),
            loading: self.loading,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.machine.state()
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn loaded_task(&self) -> Option<&TaskRecord> {
        self.loaded_task.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn reject(&self, action: FormAction) -> FormError {
        crate::form::StateError::InvalidTransition {
            from: self.machine.state(),
            action,
        }
        .into()
    }
}

impl Drop for TaskFormController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::fetch::{Notice, RecordingNotifier};
    use crate::form::host::RecordingHost;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taskdesk_client::{ApiError, Priority, TaskStatus};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(TaskId),
        Create(TaskDraft),
        Update(TaskId, TaskDraft),
    }

    #[derive(Default)]
    struct FakeStore {
        record: Option<TaskRecord>,
        fail_writes: bool,
        hang_fetch: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeStore {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskStore for FakeStore {
        async fn fetch_task(
            &self,
            id: &TaskId,
            _token: &SessionToken,
        ) -> taskdesk_client::Result<TaskRecord> {
            self.calls.lock().unwrap().push(Call::Fetch(id.clone()));
            if self.hang_fetch {
                std::future::pending::<()>().await;
            }
            self.record.clone().ok_or_else(|| ApiError::Api {
                code: 404,
                message: "Task with given id not found".to_string(),
            })
        }

        async fn create_task(
            &self,
            draft: &TaskDraft,
            _token: &SessionToken,
        ) -> taskdesk_client::Result<SaveAck> {
            self.calls.lock().unwrap().push(Call::Create(draft.clone()));
            self.write_result()
        }

        async fn update_task(
            &self,
            id: &TaskId,
            draft: &TaskDraft,
            _token: &SessionToken,
        ) -> taskdesk_client::Result<SaveAck> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(id.clone(), draft.clone()));
            self.write_result()
        }
    }

    impl FakeStore {
        fn write_result(&self) -> taskdesk_client::Result<SaveAck> {
            if self.fail_writes {
                Err(ApiError::Timeout { duration: 30 })
            } else {
                Ok(SaveAck {
                    msg: Some("saved".to_string()),
                    task: None,
                })
            }
        }
    }

    fn token() -> SessionToken {
        SessionToken::new("token-abc")
    }

    fn old_record() -> TaskRecord {
        TaskRecord {
            id: Some(TaskId::from("42")),
            description: "Old".to_string(),
            due_date: None,
            reminder: None,
            priority: Some(Priority::Low),
            status: Some(TaskStatus::Pending),
        }
    }

    fn controller(store: Arc<FakeStore>) -> (TaskFormController, RecordingHost) {
        let host = RecordingHost::new();
        let controller = TaskFormController::new(store, Box::new(host.clone()));
        (controller, host)
    }

    #[tokio::test]
    async fn test_add_mode_submit_posts_draft_and_navigates_home() {
        let store = Arc::new(FakeStore::default());
        let (mut form, host) = controller(store.clone());

        form.open(None, &token()).await.unwrap();
        assert_eq!(host.title().as_deref(), Some("Add Task"));
        assert_eq!(form.phase(), FormPhase::Ready);
        assert!(form.loaded_task().is_none());

        form.handle_field_change(TaskField::Description, "Buy milk")
            .unwrap();
        let outcome = form.submit(&token()).await.unwrap();

        let expected = TaskDraft {
            description: "Buy milk".to_string(),
            ..TaskDraft::default()
        };
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(store.calls(), vec![Call::Create(expected)]);
        assert_eq!(host.visited(), vec![HOME_PATH.to_string()]);
        assert_eq!(form.phase(), FormPhase::Navigated);
    }

    #[tokio::test]
    async fn test_update_mode_loads_then_puts_edited_draft() {
        let store = Arc::new(FakeStore {
            record: Some(old_record()),
            ..FakeStore::default()
        });
        let (mut form, host) = controller(store.clone());

        form.open(Some(TaskId::from("42")), &token()).await.unwrap();
        assert_eq!(host.title().as_deref(), Some("Edit Task"));
        assert_eq!(form.draft().due_date, "");
        assert_eq!(form.draft().reminder, "");

        form.handle_field_change(TaskField::Description, "New").unwrap();
        form.submit(&token()).await.unwrap();

        let expected = TaskDraft {
            description: "New".to_string(),
            due_date: String::new(),
            reminder: String::new(),
            priority: "low".to_string(),
            status: "pending".to_string(),
        };
        assert_eq!(
            store.calls(),
            vec![
                Call::Fetch(TaskId::from("42")),
                Call::Update(TaskId::from("42"), expected),
            ]
        );
        assert_eq!(host.visited(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing_and_replaces_errors() {
        let store = Arc::new(FakeStore::default());
        let (mut form, host) = controller(store.clone());
        form.initialize(None).unwrap();

        form.handle_field_change(TaskField::DueDate, "not-a-date").unwrap();
        let outcome = form.submit(&token()).await.unwrap();
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(TaskField::Description));
        assert!(errors.contains(TaskField::DueDate));

        form.handle_field_change(TaskField::DueDate, "2024-05-01").unwrap();
        form.submit(&token()).await.unwrap();
        assert!(form.errors().contains(TaskField::Description));
        assert!(!form.errors().contains(TaskField::DueDate));

        assert!(store.calls().is_empty());
        assert!(host.visited().is_empty());
        assert_eq!(form.phase(), FormPhase::Ready);
    }

    #[tokio::test]
    async fn test_failed_submit_does_not_navigate() {
        let store = Arc::new(FakeStore {
            fail_writes: true,
            ..FakeStore::default()
        });
        let notifier = RecordingNotifier::new();
        let host = RecordingHost::new();
        let mut form = TaskFormController::new(store.clone(), Box::new(host.clone()))
            .with_notifier(Arc::new(notifier.clone()));
        form.initialize(None).unwrap();
        form.handle_field_change(TaskField::Description, "Buy milk")
            .unwrap();

        let err = form.submit(&token()).await.unwrap_err();
        assert!(matches!(err, FormError::Request(ApiError::Timeout { .. })));
        assert_eq!(form.phase(), FormPhase::Ready);
        assert!(!form.is_loading());
        assert!(host.visited().is_empty());
        assert_eq!(
            notifier.notices(),
            vec![Notice::Error("Request timeout after 30s".to_string())]
        );
    }

    #[tokio::test]
    async fn test_reset_restores_loaded_snapshot() {
        let store = Arc::new(FakeStore {
            record: Some(old_record()),
            ..FakeStore::default()
        });
        let (mut form, _host) = controller(store);
        form.open(Some(TaskId::from("42")), &token()).await.unwrap();
        let baseline = form.draft().clone();

        form.handle_field_change(TaskField::Description, "New").unwrap();
        form.handle_field_change(TaskField::Priority, "high").unwrap();
        form.handle_field_change(TaskField::Reminder, "2024-05-01T08:00")
            .unwrap();
        form.handle_reset().unwrap();

        assert_eq!(form.draft(), &baseline);
    }

    #[tokio::test]
    async fn test_reset_in_add_mode_restores_defaults() {
        let (mut form, _host) = controller(Arc::new(FakeStore::default()));
        form.initialize(None).unwrap();
        form.handle_field_change(TaskField::Status, "completed").unwrap();
        form.handle_reset().unwrap();
        assert_eq!(form.draft(), &TaskDraft::default());
    }

    #[tokio::test]
    async fn test_field_change_touches_only_named_field() {
        let (mut form, _host) = controller(Arc::new(FakeStore::default()));
        form.initialize(None).unwrap();
        let before = form.draft().clone();

        form.handle_named_field_change("status", "in-progress").unwrap();
        assert_eq!(form.draft().status, "in-progress");
        assert_eq!(
            TaskDraft {
                status: before.status.clone(),
                ..form.draft().clone()
            },
            before
        );

        let err = form.handle_named_field_change("owner", "me").unwrap_err();
        assert!(matches!(err, FormError::UnknownField(name) if name == "owner"));
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal_and_reported() {
        let notifier = RecordingNotifier::new();
        let mut form = TaskFormController::new(
            Arc::new(FakeStore::default()),
            Box::new(RecordingHost::new()),
        )
        .with_notifier(Arc::new(notifier.clone()));

        let err = form
            .open(Some(TaskId::from("404")), &token())
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Request(ApiError::Api { code: 404, .. })));
        assert_eq!(form.phase(), FormPhase::Failed);
        assert!(form.loaded_task().is_none());
        assert_eq!(notifier.notices().len(), 1);
        assert!(form.handle_field_change(TaskField::Description, "x").is_err());
    }

    #[tokio::test]
    async fn test_teardown_during_load_discards_result() {
        let store = Arc::new(FakeStore {
            record: Some(old_record()),
            hang_fetch: true,
            ..FakeStore::default()
        });
        let (mut form, _host) = controller(store);
        form.initialize(Some(TaskId::from("42"))).unwrap();

        let shutdown = form.cancellation_token();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            shutdown.cancel();
        });

        let err = form.load_existing(&token()).await.unwrap_err();
        assert!(matches!(err, FormError::Cancelled));
        assert_eq!(form.phase(), FormPhase::Disposed);
        assert_eq!(form.draft(), &TaskDraft::default());
        assert!(form.loaded_task().is_none());
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_parent_token_tears_down_form() {
        let parent = CancellationToken::new();
        let (form, _host) = controller(Arc::new(FakeStore::default()));
        let mut form = form.with_parent_token(&parent);
        form.initialize(Some(TaskId::from("42"))).unwrap();

        parent.cancel();
        let err = form.load_existing(&token()).await.unwrap_err();
        assert!(matches!(err, FormError::Cancelled));
    }

    #[tokio::test]
    async fn test_load_in_add_mode_is_rejected() {
        let (mut form, _host) = controller(Arc::new(FakeStore::default()));
        form.initialize(None).unwrap();
        assert!(matches!(
            form.load_existing(&token()).await,
            Err(FormError::MissingTaskId)
        ));
    }

    #[tokio::test]
    async fn test_cancel_navigates_home() {
        let store = Arc::new(FakeStore::default());
        let (mut form, host) = controller(store.clone());
        form.initialize(None).unwrap();
        form.cancel().unwrap();

        assert_eq!(host.visited(), vec!["/".to_string()]);
        assert_eq!(form.phase(), FormPhase::Navigated);
        assert!(form.submit(&token()).await.is_err());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_snapshots_follow_state_changes() {
        let (mut form, _host) = controller(Arc::new(FakeStore::default()));
        let mut snapshots = form.subscribe();
        assert_eq!(snapshots.borrow_and_update().phase, FormPhase::Init);

        form.initialize(None).unwrap();
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().phase, FormPhase::Ready);

        form.handle_field_change(TaskField::Description, "Walk dog")
            .unwrap();
        let snapshot = snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.draft.description, "Walk dog");
        assert_eq!(snapshot, form.snapshot());
        assert!(!snapshot.labels.shows_reset);
        assert!(!snapshot.terminal);
    }

    #[tokio::test]
    async fn test_snapshot_carries_update_labels_and_terminal_flag() {
        let store = Arc::new(FakeStore {
            record: Some(old_record()),
            ..FakeStore::default()
        });
        let (mut form, _host) = controller(store);
        form.open(Some(TaskId::from("42")), &token()).await.unwrap();

        let snapshot = form.snapshot();
        assert_eq!(snapshot.labels.heading, "Edit Task");
        assert_eq!(snapshot.labels.submit_label, "Update Task");
        assert!(snapshot.labels.shows_reset);

        form.submit(&token()).await.unwrap();
        assert!(form.subscribe().borrow().terminal);
    }

    #[tokio::test]
    async fn test_validate_is_idempotent() {
        let (mut form, _host) = controller(Arc::new(FakeStore::default()));
        form.initialize(None).unwrap();
        form.handle_field_change(TaskField::Priority, "urgent").unwrap();
        assert_eq!(form.validate(), form.validate());
        assert_eq!(form.validate().len(), 2);
    }
}
