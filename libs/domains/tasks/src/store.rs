//! Record store boundary.
//!
//! The transactional store that owns task rows lives outside this
//! subsystem; the cache only needs a way to load a group's tasks on a
//! miss.

use crate::error::TaskResult;
use crate::models::Task;
use async_trait::async_trait;

/// Loader for a group's tasks, implemented by the external record store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Load all tasks belonging to a group, in stable order.
    async fn load_tasks(&self, group_id: i64) -> TaskResult<Vec<Task>>;
}
