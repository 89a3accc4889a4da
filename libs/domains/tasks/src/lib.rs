//! Tasks Domain: change propagation
//!
//! Every committed task mutation flows through this crate:
//!
//! ```text
//! store write commits
//!   ↓
//! EventPublisher::publish_and_invalidate
//!   ├─ append TaskEvent to the tasks_topic stream (bounded, awaited)
//!   └─ invalidate the group's TaskCache entry (always, even if the
//!      append failed)
//! ```
//!
//! Reads go through `TaskCache::get_or_load`, which serves the cached
//! per-group task list (60 s TTL) and falls back to the external
//! `TaskStore` on a miss.

pub mod cache;
pub mod error;
pub mod events;
pub mod models;
pub mod publisher;
pub mod store;
pub mod streams;

// Re-export commonly used types
pub use cache::{CacheBackend, RedisCache, TaskCache, DEFAULT_CACHE_TTL};
pub use error::{TaskError, TaskResult};
pub use events::{EventTask, TaskAction, TaskEvent};
pub use models::{Task, TaskView};
pub use publisher::{EventPublisher, EventSink, PublishOutcome};
pub use store::TaskStore;
pub use streams::TaskEventTopic;
