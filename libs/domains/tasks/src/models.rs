use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task entity, the post-commit snapshot of a task row.
///
/// The record store owns persistence; this is the shape it hands to the
/// change-propagation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: i64,
    /// Task title
    pub title: String,
    /// Task description
    pub description: String,
    /// Whether the task is completed
    pub completed: bool,
    /// Group the task belongs to; members of a group see each other's tasks
    pub group_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Read-model view of a task, as stored in the per-group cache.
///
/// Omits `group_id` since the cache entry is already keyed by group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: task.created_at,
        }
    }
}
