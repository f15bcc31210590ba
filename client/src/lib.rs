//! Client-side task state synchronization engine.
//!
//! Keeps an in-memory task list consistent with the remote `tasks` collection
//! across create, toggle and reload, applying optimistic updates and rolling
//! them back when the backend rejects a request. Rendering is somebody
//! else's job: consumers subscribe to [`SyncEvent`]s and never touch the
//! store directly.

pub mod api;
pub mod controller;
pub mod error;
pub mod event;
pub mod store;

pub use api::{HttpTasksApi, TasksApi};
pub use controller::SyncController;
pub use error::SyncError;
pub use event::SyncEvent;
pub use store::TaskStore;
