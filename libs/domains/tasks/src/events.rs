//! Task change events.
//!
//! Wire contract (UTF-8 JSON on the `tasks_topic` stream and, unchanged,
//! on the `task_event` WebSocket frame):
//!
//! ```json
//! {"action": "create", "task": {"id": 1, "title": "...",
//!  "description": "...", "completed": false, "group_id": 1}}
//! ```

use crate::models::Task;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The mutation kind a TaskEvent describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskAction {
    Create,
    Update,
    Delete,
}

/// The task snapshot carried inside an event.
///
/// For `delete`, this is captured before the row is removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventTask {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub group_id: i64,
}

impl From<&Task> for EventTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            group_id: task.group_id,
        }
    }
}

/// One event per committed mutation. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskEvent {
    pub action: TaskAction,
    pub task: EventTask,
}

impl TaskEvent {
    pub fn new(action: TaskAction, task: &Task) -> Self {
        Self {
            action,
            task: EventTask::from(task),
        }
    }

    /// The group whose cache entry and subscribers this event concerns.
    pub fn group_id(&self) -> i64 {
        self.task.group_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_task() -> Task {
        Task {
            id: 7,
            title: "buy milk".to_string(),
            description: "2 liters".to_string(),
            completed: false,
            group_id: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(TaskAction::Create.to_string(), "create");
        assert_eq!(
            serde_json::to_string(&TaskAction::Delete).unwrap(),
            "\"delete\""
        );
        let action: TaskAction = "update".parse().unwrap();
        assert_eq!(action, TaskAction::Update);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = TaskEvent::new(TaskAction::Create, &sample_task());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "action": "create",
                "task": {
                    "id": 7,
                    "title": "buy milk",
                    "description": "2 liters",
                    "completed": false,
                    "group_id": 1
                }
            })
        );
    }

    #[test]
    fn test_event_round_trips_through_the_stream() {
        let event = TaskEvent::new(TaskAction::Delete, &sample_task());
        let json = serde_json::to_string(&event).unwrap();
        let decoded: TaskEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, event);
        assert_eq!(decoded.group_id(), 1);
    }
}
