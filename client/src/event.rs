use shared::Task;

/// Notifications for the rendering layer. One event per observable store
/// transition; subscribers re-render from the attached payload and never
/// reach back into the store.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// An optimistic placeholder entered the store.
    Added { task: Task },
    /// The backend acknowledged a create; the placeholder id was replaced by
    /// the server-assigned one.
    Confirmed { task: Task },
    /// A request failed. For a failed create the placeholder is attached
    /// (already rolled back), for a failed remove the surviving task, for a
    /// failed reload nothing.
    Failed { task: Option<Task>, error: String },
    /// A completion flag changed. Emitted for the optimistic flip, and again
    /// with `error` set when the backend rejected it and the flip was
    /// reverted.
    Updated { task: Task, error: Option<String> },
    /// The backend confirmed a delete and the task left the store.
    Removed { task: Task },
    /// A full reload replaced the store contents.
    Reloaded { tasks: Vec<Task> },
}
