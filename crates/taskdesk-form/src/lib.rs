/*
[INPUT]:  Public API exports for the taskdesk-form crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod commands;
pub mod config;
pub mod error;
pub mod form;

// Re-export main types for convenience
pub use config::TaskdeskConfig;
pub use error::FormError;
pub use form::{FormSnapshot, SubmitOutcome, TaskFormController};
