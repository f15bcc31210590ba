//! Typed wrapper over the remote `tasks` collection endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{CreateTaskRequest, Task, TaskId, UpdateCompletionRequest};

use crate::error::SyncError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam between the controller and the wire. One method per collection
/// operation, one request/response cycle each, no retries — retry policy, if
/// any, belongs to the caller.
#[async_trait]
pub trait TasksApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, SyncError>;

    /// Submit `{name, isCompleted: false}` and return the created
    /// representation with its server-assigned id. Callers validate that
    /// `name` is non-empty before invoking.
    async fn create_task(&self, name: &str) -> Result<Task, SyncError>;

    async fn update_completion(&self, id: &TaskId, is_completed: bool) -> Result<(), SyncError>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), SyncError>;
}

/// `TasksApi` over HTTP, speaking the PostgREST-flavored dialect: row filters
/// as `?id=eq.<id>` query parameters, created representations returned on
/// request via the `Prefer` header.
pub struct HttpTasksApi {
    client: Client,
    base_url: String,
}

/// Create responses differ by backend variant: some return the bare object,
/// some an array containing it.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CreatedRepresentation {
    Single(Task),
    Batch(Vec<Task>),
}

impl HttpTasksApi {
    pub fn new(base_url: &str) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, SyncError> {
        serde_json::from_slice(body).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TasksApi for HttpTasksApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, SyncError> {
        let response = self.client.get(self.collection_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::status(status));
        }
        let body = response.bytes().await?;
        Self::decode(&body)
    }

    async fn create_task(&self, name: &str) -> Result<Task, SyncError> {
        let request = CreateTaskRequest {
            name: name.to_string(),
            is_completed: false,
        };
        let response = self
            .client
            .post(self.collection_url())
            .header("Prefer", "return=representation")
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::status(status));
        }
        let body = response.bytes().await?;
        match Self::decode::<CreatedRepresentation>(&body)? {
            CreatedRepresentation::Single(task) => Ok(task),
            CreatedRepresentation::Batch(tasks) => tasks.into_iter().next().ok_or_else(|| {
                SyncError::Decode("create returned an empty representation".to_string())
            }),
        }
    }

    async fn update_completion(&self, id: &TaskId, is_completed: bool) -> Result<(), SyncError> {
        let response = self
            .client
            .patch(self.collection_url())
            .query(&[("id", format!("eq.{id}"))])
            .json(&UpdateCompletionRequest { is_completed })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::status(status));
        }
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.collection_url())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::status(status));
        }
        Ok(())
    }
}
