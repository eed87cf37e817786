use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Operation, RemoteCallFailed};
use crate::model::task::{NewTask, Task, TaskId};
use crate::store::traits::RemoteTaskStore;

/// `RemoteTaskStore` backed by the task server's REST API.
#[derive(Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: String,
}

impl HttpTaskStore {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }
}

fn failed(operation: Operation) -> impl Fn(reqwest::Error) -> RemoteCallFailed {
    move |err| RemoteCallFailed::new(operation, err)
}

fn check_status(operation: Operation, response: Response) -> Result<Response, RemoteCallFailed> {
    response.error_for_status().map_err(failed(operation))
}

#[async_trait]
impl RemoteTaskStore for HttpTaskStore {
    async fn list(&self) -> Result<Vec<Task>, RemoteCallFailed> {
        let url = self.collection_url();
        debug!(%url, "GET task list");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(failed(Operation::List))?;
        check_status(Operation::List, response)?
            .json::<Vec<Task>>()
            .await
            .map_err(failed(Operation::List))
    }

    async fn create(&self, task: &NewTask) -> Result<Task, RemoteCallFailed> {
        let url = self.collection_url();
        debug!(%url, title = %task.title, "POST task");
        let response = self
            .client
            .post(&url)
            .json(task)
            .send()
            .await
            .map_err(failed(Operation::Create))?;
        check_status(Operation::Create, response)?
            .json::<Task>()
            .await
            .map_err(failed(Operation::Create))
    }

    async fn update(&self, task: &Task) -> Result<(), RemoteCallFailed> {
        let url = self.item_url(task.id);
        debug!(%url, completed = task.completed, "PUT task");
        let response = self
            .client
            .put(&url)
            .json(task)
            .send()
            .await
            .map_err(failed(Operation::Update))?;
        check_status(Operation::Update, response)?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), RemoteCallFailed> {
        let url = self.item_url(id);
        debug!(%url, "DELETE task");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(failed(Operation::Delete))?;
        check_status(Operation::Delete, response)?;
        Ok(())
    }
}
