//! Reconciles user actions with backend state.

use std::collections::HashSet;

use shared::{Task, TaskId};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::api::TasksApi;
use crate::error::SyncError;
use crate::event::SyncEvent;
use crate::store::TaskStore;

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct ControllerState {
    store: TaskStore,
    /// Ids with an outstanding request, placeholder ids included. A second
    /// mutation against one of these is rejected with `Conflict` until the
    /// first resolves.
    in_flight: HashSet<TaskId>,
}

/// Owns the [`TaskStore`] and drives it against a [`TasksApi`]: mutations are
/// applied optimistically, then confirmed or rolled back once the backend
/// answers. Constructed once per session and handed to the presentation
/// adapter, which listens via [`subscribe`](SyncController::subscribe).
///
/// The state lock is never held across a network await, so independent
/// actions interleave freely; per-id ordering comes from the in-flight set.
pub struct SyncController<A> {
    api: A,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<SyncEvent>,
}

impl<A: TasksApi> SyncController<A> {
    pub fn new(api: A) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            state: Mutex::new(ControllerState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current list in display order.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.store.all().to_vec()
    }

    /// Fetch the full collection and swap it in. On failure the current list
    /// stays untouched so the observer keeps rendering it.
    pub async fn reload(&self) -> Result<Vec<Task>, SyncError> {
        match self.api.list_tasks().await {
            Ok(listed) => {
                let mut state = self.state.lock().await;
                state.store.replace_all(listed);
                let tasks = state.store.all().to_vec();
                drop(state);
                self.emit(SyncEvent::Reloaded {
                    tasks: tasks.clone(),
                });
                Ok(tasks)
            }
            Err(err) => {
                tracing::debug!(error = %err, "reload failed, keeping current list");
                self.emit(SyncEvent::Failed {
                    task: None,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Create a task. A placeholder with a throwaway id is rendered
    /// immediately; the server representation replaces it on confirmation,
    /// or it is dropped again on failure.
    pub async fn add(&self, name: &str) -> Result<Task, SyncError> {
        if name.trim().is_empty() {
            return Err(SyncError::Validation(
                "task name must not be empty".to_string(),
            ));
        }

        let placeholder = Task::new(placeholder_id(), name);
        let pending_id = placeholder.id.clone();
        {
            let mut state = self.state.lock().await;
            state.store.upsert(placeholder.clone());
            state.in_flight.insert(pending_id.clone());
        }
        tracing::debug!(task = %pending_id, "optimistic add applied");
        self.emit(SyncEvent::Added {
            task: placeholder.clone(),
        });

        match self.api.create_task(name).await {
            Ok(created) => {
                let mut state = self.state.lock().await;
                state.store.remove(&pending_id);
                state.in_flight.remove(&pending_id);
                state.store.upsert(created.clone());
                drop(state);
                tracing::debug!(task = %created.id, "create confirmed");
                self.emit(SyncEvent::Confirmed {
                    task: created.clone(),
                });
                Ok(created)
            }
            Err(err) => {
                let mut state = self.state.lock().await;
                state.store.remove(&pending_id);
                state.in_flight.remove(&pending_id);
                drop(state);
                tracing::debug!(task = %pending_id, error = %err, "create rejected, placeholder dropped");
                self.emit(SyncEvent::Failed {
                    task: Some(placeholder),
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Flip a task's completion flag, optimistically. On rejection the prior
    /// value is restored and a second `Updated` event carries the error.
    pub async fn toggle(&self, id: &TaskId) -> Result<Task, SyncError> {
        let (previous, updated) = {
            let mut state = self.state.lock().await;
            let previous = match state.store.get(id) {
                Some(task) => task.is_completed,
                None => return Err(SyncError::NotFound(id.clone())),
            };
            if state.in_flight.contains(id) {
                return Err(SyncError::Conflict(id.clone()));
            }
            let Some(updated) = state.store.set_completion(id, !previous) else {
                return Err(SyncError::NotFound(id.clone()));
            };
            state.in_flight.insert(id.clone());
            (previous, updated)
        };
        tracing::debug!(task = %id, is_completed = updated.is_completed, "optimistic toggle applied");
        self.emit(SyncEvent::Updated {
            task: updated.clone(),
            error: None,
        });

        match self.api.update_completion(id, !previous).await {
            Ok(()) => {
                self.state.lock().await.in_flight.remove(id);
                Ok(updated)
            }
            Err(err) => {
                let mut state = self.state.lock().await;
                state.in_flight.remove(id);
                let reverted = state.store.set_completion(id, previous);
                drop(state);
                tracing::debug!(task = %id, error = %err, "toggle rejected, reverted");
                if let Some(task) = reverted {
                    self.emit(SyncEvent::Updated {
                        task,
                        error: Some(err.to_string()),
                    });
                }
                Err(err)
            }
        }
    }

    /// Delete a task. Not optimistic: the entry leaves the store only once
    /// the backend has acknowledged.
    pub async fn remove(&self, id: &TaskId) -> Result<Task, SyncError> {
        {
            let mut state = self.state.lock().await;
            if state.store.get(id).is_none() {
                return Err(SyncError::NotFound(id.clone()));
            }
            if state.in_flight.contains(id) {
                return Err(SyncError::Conflict(id.clone()));
            }
            state.in_flight.insert(id.clone());
        }

        match self.api.delete_task(id).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.in_flight.remove(id);
                let removed = state.store.remove(id);
                drop(state);
                let task = removed.ok_or_else(|| SyncError::NotFound(id.clone()))?;
                tracing::debug!(task = %id, "delete confirmed");
                self.emit(SyncEvent::Removed { task: task.clone() });
                Ok(task)
            }
            Err(err) => {
                let mut state = self.state.lock().await;
                state.in_flight.remove(id);
                let survivor = state.store.get(id).cloned();
                drop(state);
                tracing::debug!(task = %id, error = %err, "delete rejected, keeping task");
                self.emit(SyncEvent::Failed {
                    task: survivor,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn emit(&self, event: SyncEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

fn placeholder_id() -> TaskId {
    TaskId::new(Uuid::new_v4().to_string())
}
