//! Thin collaborator for the sync engine: the `tasks` collection endpoint
//! over in-memory state. Ids and `createdAt` are assigned here, never by the
//! client. Row filters follow the `?id=eq.<id>` convention.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use shared::{CreateTaskRequest, Task, TaskId, UpdateCompletionRequest};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Insertion-ordered task collection.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl TaskRegistry {
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn create(&self, name: String, is_completed: bool) -> Task {
        let task = Task {
            id: TaskId::new(Uuid::new_v4().to_string()),
            name,
            is_completed,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        self.tasks.write().await.push(task.clone());
        task
    }

    /// Returns false when the id matches nothing.
    pub async fn set_completion(&self, id: &TaskId, is_completed: bool) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|t| &t.id == id) {
            Some(task) => {
                task.is_completed = is_completed;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: &TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        tasks.len() != before
    }
}

pub fn app(registry: TaskRegistry) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(list_tasks)
                .post(create_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

async fn list_tasks(State(registry): State<TaskRegistry>) -> Json<Vec<Task>> {
    Json(registry.list().await)
}

async fn create_task(
    State(registry): State<TaskRegistry>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Vec<Task>>), StatusCode> {
    if payload.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let task = registry.create(payload.name, payload.is_completed).await;
    tracing::debug!(task = %task.id, "task created");
    // Created representation as a singleton array, return=representation
    // style.
    Ok((StatusCode::CREATED, Json(vec![task])))
}

async fn update_task(
    State(registry): State<TaskRegistry>,
    Query(params): Query<HashMap<String, String>>,
    Json(payload): Json<UpdateCompletionRequest>,
) -> Result<StatusCode, StatusCode> {
    let id = id_filter(&params)?;
    if registry.set_completion(&id, payload.is_completed).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn delete_task(
    State(registry): State<TaskRegistry>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, StatusCode> {
    let id = id_filter(&params)?;
    if registry.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

fn id_filter(params: &HashMap<String, String>) -> Result<TaskId, StatusCode> {
    params
        .get("id")
        .and_then(|value| value.strip_prefix("eq."))
        .map(TaskId::new)
        .ok_or(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let registry = TaskRegistry::default();

        let task = registry.create("wash up".to_string(), false).await;

        assert!(!task.id.as_str().is_empty());
        assert!(task.created_at.is_some());
        assert_eq!(registry.list().await, vec![task]);
    }

    #[tokio::test]
    async fn set_completion_and_remove_report_misses() {
        let registry = TaskRegistry::default();
        let task = registry.create("flip".to_string(), false).await;

        assert!(registry.set_completion(&task.id, true).await);
        assert!(registry.list().await[0].is_completed);
        assert!(!registry.set_completion(&TaskId::new("ghost"), true).await);

        assert!(registry.remove(&task.id).await);
        assert!(!registry.remove(&task.id).await);
        assert!(registry.list().await.is_empty());
    }

    #[test]
    fn id_filter_requires_the_eq_prefix() {
        let mut params = HashMap::new();
        assert_eq!(id_filter(&params), Err(StatusCode::BAD_REQUEST));

        params.insert("id".to_string(), "t1".to_string());
        assert_eq!(id_filter(&params), Err(StatusCode::BAD_REQUEST));

        params.insert("id".to_string(), "eq.t1".to_string());
        assert_eq!(id_filter(&params), Ok(TaskId::new("t1")));
    }
}
