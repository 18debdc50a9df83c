/*
[INPUT]:  Task ids, draft payloads and session tokens
[OUTPUT]: Task records and save acknowledgements
[POS]:    HTTP layer - task endpoints (require Authorization header)
[UPDATE]: When adding task endpoints or changing payload shapes
*/

use reqwest::{Method, Url};
use tracing::info;

use crate::auth::SessionToken;
use crate::http::client::append_segments;
use crate::http::{Result, TaskdeskClient};
use crate::types::{SaveAck, TaskDraft, TaskEnvelope, TaskId, TaskRecord};

const TASKS: &str = "tasks";

/// Path of a task resource below the API root, with the id escaped
///
/// Fails for ids that cannot name a single resource ("", ".", "..").
pub fn task_path(id: &TaskId) -> Result<String> {
    let mut url = Url::parse("http://localhost/")?;
    append_segments(&mut url, &[TASKS, id.as_str()])?;
    Ok(url.path().to_string())
}

impl TaskdeskClient {
    /// Fetch one task
    ///
    /// GET /tasks/{id}
    pub async fn get_task(&self, id: &TaskId, token: &SessionToken) -> Result<TaskRecord> {
        let builder = self.authed_request(Method::GET, &[TASKS, id.as_str()], token)?;
        let envelope: TaskEnvelope = self.send_json(builder).await?;
        Ok(envelope.task)
    }

    /// Create a task from a draft
    ///
    /// POST /tasks
    pub async fn create_task(&self, draft: &TaskDraft, token: &SessionToken) -> Result<SaveAck> {
        let builder = self.authed_request(Method::POST, &[TASKS], token)?;
        let ack = self.send_ack(builder.json(draft)).await?;
        info!(message = ?ack.msg, "task created");
        Ok(ack)
    }

    /// Replace the fields of an existing task
    ///
    /// PUT /tasks/{id}
    pub async fn update_task(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
        token: &SessionToken,
    ) -> Result<SaveAck> {
        let builder = self.authed_request(Method::PUT, &[TASKS, id.as_str()], token)?;
        let ack = self.send_ack(builder.json(draft)).await?;
        info!(task_id = %id, message = ?ack.msg, "task updated");
        Ok(ack)
    }
}
