/*
[INPUT]:  Store errors, state machine rejections, field name parsing
[OUTPUT]: Unified error type for form operations
[POS]:    Error handling layer - form crate
[UPDATE]: When form operations gain new failure modes
*/

use taskdesk_client::{ApiError, UnknownVariant};
use thiserror::Error;

use crate::form::StateError;

#[derive(Error, Debug)]
pub enum FormError {
    /// Load, create or update call failed; already reported to the notifier
    #[error("request failed: {0}")]
    Request(#[from] ApiError),

    /// Operation not allowed in the current form phase
    #[error(transparent)]
    InvalidTransition(#[from] StateError),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The form was torn down while a load was outstanding
    #[error("form was torn down before the load completed")]
    Cancelled,

    #[error("form is in add mode and has no task id to load")]
    MissingTaskId,
}

impl From<UnknownVariant> for FormError {
    fn from(err: UnknownVariant) -> Self {
        FormError::UnknownField(err.value)
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
