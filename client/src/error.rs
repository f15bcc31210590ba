use shared::TaskId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid task: {0}")]
    Validation(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("no task with id {0}")]
    NotFound(TaskId),

    #[error("request already in flight for task {0}")]
    Conflict(TaskId),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

impl SyncError {
    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        SyncError::Transport(format!("server returned {status}"))
    }
}
