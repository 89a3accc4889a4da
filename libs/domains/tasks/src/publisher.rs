//! Event publisher.
//!
//! Called synchronously by mutation handlers after a committed write.
//! The append is awaited so the caller only returns once its event is
//! durably queued; the cache invalidation for the affected group runs
//! after the append attempt whether or not it succeeded. Event delivery
//! is best-effort relative to the store, reads must stay correct.

use crate::cache::TaskCache;
use crate::error::TaskResult;
use crate::events::{TaskAction, TaskEvent};
use crate::models::Task;
use async_trait::async_trait;
use std::sync::Arc;
use stream_bus::{StreamError, StreamProducer};
use tracing::{debug, warn};

/// Append seam for the event bus.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append the event, returning the bus-assigned entry id.
    async fn append(&self, event: &TaskEvent) -> Result<String, StreamError>;
}

#[async_trait]
impl EventSink for StreamProducer {
    async fn append(&self, event: &TaskEvent) -> Result<String, StreamError> {
        self.send(event).await
    }
}

/// Whether a mutation's event made it onto the bus.
///
/// `Dropped` is not an error to the caller: the store write already
/// committed and the cache was invalidated, so reads are correct.
/// Real-time clients just won't see this particular event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { stream_id: String },
    Dropped,
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Publishes task change events and invalidates the read cache.
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    cache: Arc<TaskCache>,
}

impl EventPublisher {
    pub fn new(sink: Arc<dyn EventSink>, cache: Arc<TaskCache>) -> Self {
        Self { sink, cache }
    }

    /// Publish one event for a committed mutation, then invalidate the
    /// cached task list of the affected group.
    ///
    /// Call exactly once per committed create/update/delete. For
    /// `delete`, pass the snapshot captured before the row was removed.
    pub async fn publish_and_invalidate(
        &self,
        action: TaskAction,
        task: &Task,
    ) -> TaskResult<PublishOutcome> {
        let event = TaskEvent::new(action, task);

        let outcome = match self.sink.append(&event).await {
            Ok(stream_id) => {
                debug!(
                    action = %event.action,
                    task_id = task.id,
                    group_id = task.group_id,
                    stream_id = %stream_id,
                    "Published task event"
                );
                PublishOutcome::Published { stream_id }
            }
            Err(e) => {
                warn!(
                    action = %event.action,
                    task_id = task.id,
                    group_id = task.group_id,
                    error = %e,
                    "Failed to publish task event; real-time clients will miss this change"
                );
                PublishOutcome::Dropped
            }
        };

        // Invalidation runs regardless of the publish outcome.
        self.cache.invalidate(task.group_id).await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheBackend;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    type CallLog = Arc<Mutex<Vec<String>>>;

    /// Sink recording appends into a shared log.
    struct RecordingSink {
        log: CallLog,
        fail: bool,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn append(&self, event: &TaskEvent) -> Result<String, StreamError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("append:{}", event.action));
            if self.fail {
                Err(StreamError::AppendTimeout {
                    stream: "tasks_topic".to_string(),
                    timeout_ms: 5000,
                })
            } else {
                Ok("1-0".to_string())
            }
        }
    }

    /// Backend recording invalidations into the same log.
    struct RecordingBackend {
        log: CallLog,
    }

    #[async_trait]
    impl CacheBackend for RecordingBackend {
        async fn get(&self, _key: &str) -> TaskResult<Option<String>> {
            Ok(None)
        }

        async fn set_ex(&self, _key: &str, _value: String, _ttl: Duration) -> TaskResult<()> {
            Ok(())
        }

        async fn remove(&self, key: &str) -> TaskResult<()> {
            self.log.lock().unwrap().push(format!("invalidate:{}", key));
            Ok(())
        }
    }

    fn publisher(fail_publish: bool) -> (EventPublisher, CallLog) {
        let log: CallLog = Arc::default();
        let sink = Arc::new(RecordingSink {
            log: log.clone(),
            fail: fail_publish,
        });
        let cache = Arc::new(TaskCache::new(Arc::new(RecordingBackend {
            log: log.clone(),
        })));
        (EventPublisher::new(sink, cache), log)
    }

    fn task() -> Task {
        Task {
            id: 5,
            title: "buy milk".to_string(),
            description: String::new(),
            completed: false,
            group_id: 1,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_then_invalidate_in_order() {
        let (publisher, log) = publisher(false);

        let outcome = publisher
            .publish_and_invalidate(TaskAction::Create, &task())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                stream_id: "1-0".to_string()
            }
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec!["append:create", "invalidate:tasks:group:1"]
        );
    }

    #[tokio::test]
    async fn test_publish_failure_still_invalidates() {
        let (publisher, log) = publisher(true);

        let outcome = publisher
            .publish_and_invalidate(TaskAction::Update, &task())
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Dropped);
        assert!(!outcome.is_published());
        // The append was attempted first, then invalidation ran anyway.
        assert_eq!(
            *log.lock().unwrap(),
            vec!["append:update", "invalidate:tasks:group:1"]
        );
    }

    #[tokio::test]
    async fn test_one_publish_and_one_invalidate_per_mutation() {
        let (publisher, log) = publisher(false);

        publisher
            .publish_and_invalidate(TaskAction::Delete, &task())
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.iter().filter(|l| l.starts_with("append")).count(), 1);
        assert_eq!(
            log.iter().filter(|l| l.starts_with("invalidate")).count(),
            1
        );
    }
}
