use crate::model::task::{NewTask, Task, TaskId};
use anyhow::Result;

pub trait TaskRepository {
    /// Stores `task` under a freshly assigned id and returns the stored record.
    fn create(&self, task: NewTask) -> Result<Task>;
    fn list(&self) -> Result<Vec<Task>>;
    /// `None` when no task has this id.
    fn update(&self, id: TaskId, task: NewTask) -> Result<Option<Task>>;
    /// `false` when no task has this id.
    fn delete(&self, id: TaskId) -> Result<bool>;
}
