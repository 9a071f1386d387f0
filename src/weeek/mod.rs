//! Weeek task-tracking API client
//!
//! The orchestrator talks to Weeek through the [`TaskApi`] capability trait;
//! [`WeeekClient`] is the reqwest-backed implementation.

mod types;

pub use types::{NewTag, NewTask, Tag, Task, TaskLocation, TaskUpdate, Workspace, WEEEK_APP_URL};

use crate::config::WeeekConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use types::{AckEnvelope, TagEnvelope, TaskEnvelope, WorkspaceEnvelope};

/// Capabilities the orchestrator needs from the task tracker
#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the workspace the credential belongs to
    async fn get_workspace(&self) -> Result<Workspace>;

    /// Fetch a task's current attributes
    async fn get_task(&self, task_id: &str) -> Result<Task>;

    /// Merge-patch a task; populated collection fields replace the prior value
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task>;

    /// Create a task
    async fn create_task(&self, task: NewTask) -> Result<Task>;

    /// Create a tag
    async fn create_tag(&self, tag: NewTag) -> Result<Tag>;

    /// Move a task to a board column; already being there is a no-op success
    async fn move_task_to_column(&self, task_id: &str, column_id: u64) -> Result<()>;
}

/// Weeek API client
pub struct WeeekClient {
    client: Client,
    config: WeeekConfig,
}

impl WeeekClient {
    /// Create a new client
    pub fn new(config: WeeekConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }

    async fn call<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);

        debug!("weeek request: {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Api {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(format!("{url}: {e}")))
    }

    fn unwrap_entity<T>(&self, endpoint: &str, success: bool, entity: Option<T>) -> Result<T> {
        if !success {
            return Err(Error::Service {
                url: self.url(endpoint),
                detail: "api reported failure".to_string(),
            });
        }
        entity.ok_or_else(|| Error::Service {
            url: self.url(endpoint),
            detail: "entity missing from response".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TaskApi for WeeekClient {
    async fn get_workspace(&self) -> Result<Workspace> {
        let envelope: WorkspaceEnvelope = self.call(Method::GET, "ws", None::<&()>).await?;
        self.unwrap_entity("ws", envelope.success, envelope.workspace)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let endpoint = format!("tm/tasks/{task_id}");
        let envelope: TaskEnvelope = self.call(Method::GET, &endpoint, None::<&()>).await?;
        self.unwrap_entity(&endpoint, envelope.success, envelope.task)
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        let endpoint = format!("tm/tasks/{task_id}");
        let envelope: TaskEnvelope = self.call(Method::PUT, &endpoint, Some(&update)).await?;
        self.unwrap_entity(&endpoint, envelope.success, envelope.task)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        let endpoint = "tm/tasks";
        let envelope: TaskEnvelope = self.call(Method::POST, endpoint, Some(&task)).await?;
        self.unwrap_entity(endpoint, envelope.success, envelope.task)
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag> {
        let endpoint = "ws/tags";
        let envelope: TagEnvelope = self.call(Method::POST, endpoint, Some(&tag)).await?;
        self.unwrap_entity(endpoint, envelope.success, envelope.tag)
    }

    async fn move_task_to_column(&self, task_id: &str, column_id: u64) -> Result<()> {
        let endpoint = format!("tm/tasks/{task_id}/board-column");
        let body = serde_json::json!({ "boardColumnId": column_id });
        let envelope: AckEnvelope = self.call(Method::POST, &endpoint, Some(&body)).await?;
        if !envelope.success {
            return Err(Error::Service {
                url: self.url(&endpoint),
                detail: "api reported failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Deep link to a task in the Weeek web app
#[must_use]
pub fn task_link(workspace_id: u64, task_id: &str) -> String {
    format!("{WEEEK_APP_URL}/ws/{workspace_id}/task/{task_id}")
}
