use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::model::task::{NewTask, Task, TaskId};
use crate::repository::TaskRepository;
use crate::server::error::ApiError;

type SharedRepository = Arc<Mutex<Box<dyn TaskRepository + Send>>>;

#[derive(Clone)]
pub struct AppState {
    repo: SharedRepository,
}

impl AppState {
    pub fn new<R: TaskRepository + Send + 'static>(repo: R) -> Self {
        Self {
            repo: Arc::new(Mutex::new(Box::new(repo))),
        }
    }

    // Serializes read-modify-write cycles on the task file.
    fn repo(&self) -> Result<MutexGuard<'_, Box<dyn TaskRepository + Send>>, ApiError> {
        self.repo
            .lock()
            .map_err(|_| ApiError::Internal(anyhow!("task repository lock poisoned")))
    }
}

#[derive(Serialize)]
pub struct Message {
    message: &'static str,
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.repo()?.list()?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<NewTask>,
) -> Result<Json<Task>, ApiError> {
    let created = state.repo()?.create(task)?;
    info!(id = %created.id, "task created");
    Ok(Json(created))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(task): Json<NewTask>,
) -> Result<Json<Message>, ApiError> {
    match state.repo()?.update(id, task)? {
        Some(_) => {
            info!(%id, "task updated");
            Ok(Json(Message {
                message: "Task updated",
            }))
        }
        None => Err(ApiError::NotFound),
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Message>, ApiError> {
    if !state.repo()?.delete(id)? {
        return Err(ApiError::NotFound);
    }
    info!(%id, "task deleted");
    Ok(Json(Message {
        message: "Task deleted",
    }))
}
