/*
[INPUT]:  Outgoing request builders
[OUTPUT]: Correlation header (x-request-id) for each request
[POS]:    HTTP layer - request correlation for server-side tracing
[UPDATE]: When changing correlation header format
*/

use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates correlation ids attached to every API request
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIds;

impl RequestIds {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh request id
    pub fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
