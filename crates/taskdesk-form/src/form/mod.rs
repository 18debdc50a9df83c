/*
[INPUT]:  Task store, host shell, validator and notifier
[OUTPUT]: Task form controller and its collaborators
[POS]:    Form layer - add/edit task workflow
[UPDATE]: When form collaborators or exports change
*/

pub mod controller;
pub mod fetch;
pub mod host;
pub mod mode;
pub mod state_machine;
pub mod validation;

pub use controller::{FormSnapshot, SubmitOutcome, TaskFormController};
pub use fetch::{FetchOptions, Fetcher, Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use host::{FormHost, HOME_PATH, RecordingHost, TracingHost};
pub use mode::{FormLabels, FormMode};
pub use state_machine::{FormAction, FormPhase, FormStateMachine, StateError};
pub use validation::{FieldError, FieldErrors, TaskRules, Validator, validate_many_fields};
