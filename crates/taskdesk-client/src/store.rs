/*
[INPUT]:  Task ids, drafts and session tokens
[OUTPUT]: Remote task records and save acknowledgements
[POS]:    Store abstraction - seam between form logic and the HTTP client
[UPDATE]: When adding remote task operations
*/

use async_trait::async_trait;

use crate::auth::SessionToken;
use crate::http::{Result, TaskdeskClient};
use crate::types::{SaveAck, TaskDraft, TaskId, TaskRecord};

/// Remote task store operations used by the task form
///
/// Implemented by [`TaskdeskClient`]; tests and alternative backends can
/// provide their own implementation.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch a single task by id
    async fn fetch_task(&self, id: &TaskId, token: &SessionToken) -> Result<TaskRecord>;

    /// Create a new task from a draft
    async fn create_task(&self, draft: &TaskDraft, token: &SessionToken) -> Result<SaveAck>;

    /// Replace the fields of an existing task
    async fn update_task(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
        token: &SessionToken,
    ) -> Result<SaveAck>;
}

#[async_trait]
impl TaskStore for TaskdeskClient {
    async fn fetch_task(&self, id: &TaskId, token: &SessionToken) -> Result<TaskRecord> {
        self.get_task(id, token).await
    }

    async fn create_task(&self, draft: &TaskDraft, token: &SessionToken) -> Result<SaveAck> {
        TaskdeskClient::create_task(self, draft, token).await
    }

    async fn update_task(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
        token: &SessionToken,
    ) -> Result<SaveAck> {
        TaskdeskClient::update_task(self, id, draft, token).await
    }
}
