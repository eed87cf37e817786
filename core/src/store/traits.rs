use async_trait::async_trait;

use crate::error::RemoteCallFailed;
use crate::model::task::{NewTask, Task, TaskId};

/// The task server as seen from the client.
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, RemoteCallFailed>;
    /// Returns the stored record, including the id the server assigned.
    async fn create(&self, task: &NewTask) -> Result<Task, RemoteCallFailed>;
    /// Sends `task` as a full replacement. Any response body is discarded.
    async fn update(&self, task: &Task) -> Result<(), RemoteCallFailed>;
    async fn delete(&self, id: TaskId) -> Result<(), RemoteCallFailed>;
}
