use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned task identifier. The client never mints one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A task record as acknowledged by the task server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Full replacement record with `completed` negated and every other field kept.
    pub fn toggled(&self) -> Task {
        Task {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Unsaved input for a task that has not been created yet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Creation payload. New tasks always start out pending.
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: false,
        }
    }
}

/// Body of a create or update request: a task without its id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTask {
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_only_flips_completed() {
        let task = Task {
            id: TaskId(7),
            title: "Write report".to_string(),
            description: "quarterly".to_string(),
            completed: false,
        };
        let toggled = task.toggled();
        assert_eq!(toggled.id, task.id);
        assert_eq!(toggled.title, task.title);
        assert_eq!(toggled.description, task.description);
        assert!(toggled.completed);
        assert_eq!(toggled.toggled(), task);
    }

    #[test]
    fn test_draft_payload_is_pending() {
        let draft = TaskDraft::new("A", "");
        let payload = draft.to_new_task();
        assert_eq!(payload.title, "A");
        assert!(!payload.completed);
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{"id":1,"title":"A","description":"","completed":true}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId(1));
        assert!(task.completed);
        assert_eq!(serde_json::to_string(&task).unwrap(), json);
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let task: Task = serde_json::from_str(r#"{"id":3,"title":"B"}"#).unwrap();
        assert_eq!(task.description, "");
        assert!(!task.completed);
    }
}
