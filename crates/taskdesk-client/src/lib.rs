/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public taskdesk client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod store;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{SessionManager, SessionToken, TokenData};

// Re-export commonly used types from http
pub use http::{ApiError, ClientConfig, RequestIds, Result, TaskdeskClient, task_path};

pub use store::TaskStore;

// Re-export all types
pub use types::*;
