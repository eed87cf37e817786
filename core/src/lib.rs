pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod server;
pub mod service;
pub mod store;

pub use config::{ClientConfig, Config, ServerConfig};
pub use error::{Operation, RemoteCallFailed};
pub use model::task::{NewTask, Task, TaskDraft, TaskId};
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::task_service::TaskService;
pub use store::{HttpTaskStore, RemoteTaskStore};
