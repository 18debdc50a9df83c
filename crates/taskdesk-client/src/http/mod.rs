/*
[INPUT]:  HTTP client configuration and task API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod request_id;
pub mod tasks;

pub use error::{ApiError, Result};
pub use request_id::RequestIds;

pub use client::{ClientConfig, TaskdeskClient};
pub use tasks::task_path;
