/*
[INPUT]:  FormPhase and FormAction enums
[OUTPUT]: Validated phase transitions for a form instance
[POS]:    Form domain logic - lifecycle state machine
[UPDATE]: When form lifecycle transitions change
*/

use serde::Serialize;
use thiserror::Error;

/// Lifecycle phase of a single form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Init,
    Loading,
    Ready,
    Submitting,
    Navigated,
    Failed,
    Disposed,
}

impl FormPhase {
    /// No further user-driven transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FormPhase::Navigated | FormPhase::Failed | FormPhase::Disposed
        )
    }
}

/// Actions that can trigger form phase transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Add mode: the draft is usable immediately
    Open,
    BeginLoad,
    LoadSucceeded,
    LoadFailed(String),
    Edit,
    Reset,
    /// Submit rejected by validation
    Reject,
    Submit,
    SubmitSucceeded,
    SubmitFailed,
    Cancel,
    Teardown,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {action:?}")]
    InvalidTransition { from: FormPhase, action: FormAction },
}

/// State machine managing form lifecycle transitions
#[derive(Debug)]
pub struct FormStateMachine {
    current_state: FormPhase,
}

impl FormStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: FormPhase::Init,
        }
    }

    /// Check if the given action is valid from the current phase
    pub fn can_transition(&self, action: &FormAction) -> bool {
        self.next_state(action).is_some()
    }

    /// Perform a state transition
    pub fn transition(&mut self, action: FormAction) -> Result<FormPhase, StateError> {
        match self.next_state(&action) {
            Some(next) => {
                self.current_state = next;
                Ok(next)
            }
            None => Err(StateError::InvalidTransition {
                from: self.current_state,
                action,
            }),
        }
    }

    pub fn state(&self) -> FormPhase {
        self.current_state
    }

    fn next_state(&self, action: &FormAction) -> Option<FormPhase> {
        let next = match (self.current_state, action) {
            (FormPhase::Init, FormAction::Open) => FormPhase::Ready,
            (FormPhase::Init, FormAction::BeginLoad) => FormPhase::Loading,
            (FormPhase::Loading, FormAction::LoadSucceeded) => FormPhase::Ready,
            (FormPhase::Loading, FormAction::LoadFailed(_)) => FormPhase::Failed,
            (FormPhase::Ready, FormAction::Edit | FormAction::Reset | FormAction::Reject) => {
                FormPhase::Ready
            }
            (FormPhase::Ready, FormAction::Submit) => FormPhase::Submitting,
            (FormPhase::Submitting, FormAction::SubmitSucceeded) => FormPhase::Navigated,
            (FormPhase::Submitting, FormAction::SubmitFailed) => FormPhase::Ready,
            (FormPhase::Ready, FormAction::Cancel) => FormPhase::Navigated,
            (FormPhase::Disposed, FormAction::Teardown) => return None,
            (_, FormAction::Teardown) => FormPhase::Disposed,
            _ => return None,
        };
        Some(next)
    }
}

impl Default for FormStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
