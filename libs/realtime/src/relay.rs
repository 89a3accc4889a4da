//! Relay worker.
//!
//! Drains task events from the bus and pushes them to the broadcaster.
//! Events are forwarded before they are acknowledged, so a crash between
//! forward and ack replays the event on restart (at-least-once).
//!
//! Any decode or bus failure faults the worker: `run` returns the error
//! and the task ends. A poisoned entry would otherwise be redelivered
//! forever, so the worker dies loudly and the lifecycle manager restarts
//! it on the next client connection.

use crate::broadcaster::{Broadcaster, TASKS_CHANNEL};
use async_trait::async_trait;
use domain_tasks::TaskEvent;
use std::sync::Arc;
use stream_bus::{StreamError, StreamEvent};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Stream(StreamError::from(e))
    }
}

/// Source seam for the relay: a consumer-group cursor over task events.
#[async_trait]
pub trait EventSource: Send {
    /// One-time setup before the first read (e.g. ensure the consumer
    /// group exists so replay starts from the beginning of the stream).
    async fn prepare(&mut self) -> Result<(), RelayError> {
        Ok(())
    }

    /// Block for the next batch of undelivered events. An empty batch
    /// means the wait timed out; the caller polls again.
    async fn next_batch(&mut self) -> Result<Vec<StreamEvent<TaskEvent>>, RelayError>;

    /// Acknowledge one delivered event.
    async fn ack(&mut self, stream_id: &str) -> Result<(), RelayError>;
}

/// Singleton consumer forwarding bus events to connected clients.
///
/// Exactly one worker runs per process; `RelayLifecycleManager` enforces
/// that, and the consumer group enforces it across processes.
pub struct RelayWorker<S: EventSource> {
    source: S,
    broadcaster: Arc<Broadcaster>,
    channel: String,
}

impl<S: EventSource> RelayWorker<S> {
    pub fn new(source: S, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            source,
            broadcaster,
            channel: TASKS_CHANNEL.to_string(),
        }
    }

    /// Run the relay loop until a bus or decode error faults it.
    pub async fn run(mut self) -> Result<(), RelayError> {
        self.source.prepare().await?;
        info!(channel = %self.channel, "Relay worker started");

        loop {
            let batch = self.source.next_batch().await?;
            for event in batch {
                let payload = serde_json::to_string(&event.payload)?;
                let delivered = self.broadcaster.push(&self.channel, payload).await;
                debug!(
                    stream_id = %event.stream_id,
                    action = %event.payload.action,
                    age_ms = event.age_ms(),
                    delivered,
                    "Relayed task event"
                );
                self.source.ack(&event.stream_id).await?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_tasks::{Task, TaskAction};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn event(id: &str, task_id: i64) -> StreamEvent<TaskEvent> {
        let task = Task {
            id: task_id,
            title: format!("task {}", task_id),
            description: String::new(),
            completed: false,
            group_id: 1,
            created_at: chrono::Utc::now(),
        };
        StreamEvent::new(id.to_string(), TaskEvent::new(TaskAction::Create, &task))
    }

    /// Source replaying scripted batches, then blocking forever.
    struct ScriptedSource {
        batches: VecDeque<Vec<StreamEvent<TaskEvent>>>,
        acks: Arc<Mutex<Vec<String>>>,
        prepared: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn prepare(&mut self) -> Result<(), RelayError> {
            *self.prepared.lock().unwrap() = true;
            Ok(())
        }

        async fn next_batch(&mut self) -> Result<Vec<StreamEvent<TaskEvent>>, RelayError> {
            match self.batches.pop_front() {
                Some(batch) => Ok(batch),
                None => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        async fn ack(&mut self, stream_id: &str) -> Result<(), RelayError> {
            self.acks.lock().unwrap().push(stream_id.to_string());
            Ok(())
        }
    }

    /// Source whose first read fails.
    struct FailingSource;

    #[async_trait]
    impl EventSource for FailingSource {
        async fn next_batch(&mut self) -> Result<Vec<StreamEvent<TaskEvent>>, RelayError> {
            Err(RelayError::Stream(StreamError::Serialization(
                "invalid event payload".to_string(),
            )))
        }

        async fn ack(&mut self, _stream_id: &str) -> Result<(), RelayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_replays_backlog_in_order_and_acks() {
        let acks = Arc::new(Mutex::new(Vec::new()));
        let prepared = Arc::new(Mutex::new(false));
        let source = ScriptedSource {
            batches: VecDeque::from(vec![
                vec![event("1-0", 1), event("2-0", 2)],
                vec![],
                vec![event("3-0", 3)],
            ]),
            acks: acks.clone(),
            prepared: prepared.clone(),
        };

        let broadcaster = Arc::new(Broadcaster::new());
        let mut rx = broadcaster.subscribe(TASKS_CHANNEL).await;

        let worker = RelayWorker::new(source, broadcaster);
        let handle = tokio::spawn(worker.run());

        for expected_id in [1, 2, 3] {
            let frame = rx.recv().await.unwrap();
            let decoded: TaskEvent = serde_json::from_str(&frame).unwrap();
            assert_eq!(decoded.task.id, expected_id);
        }

        assert!(*prepared.lock().unwrap());
        assert_eq!(*acks.lock().unwrap(), vec!["1-0", "2-0", "3-0"]);
        handle.abort();
    }

    #[tokio::test]
    async fn test_source_error_faults_the_worker() {
        let broadcaster = Arc::new(Broadcaster::new());
        let worker = RelayWorker::new(FailingSource, broadcaster);

        let result = worker.run().await;
        assert!(matches!(
            result,
            Err(RelayError::Stream(StreamError::Serialization(_)))
        ));
    }
}
