//! Stream producer.
//!
//! Appends events to a topic with a synchronous, bounded XADD: the call
//! resolves only once Redis has acknowledged the append, so a caller that
//! gets `Ok` back knows its event is durably queued.

use crate::error::StreamError;
use crate::topic::TopicDef;
use redis::aio::ConnectionManager;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default bound on how long an append may block the caller.
pub const DEFAULT_APPEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Producer for a single topic.
#[derive(Clone)]
pub struct StreamProducer {
    redis: Arc<ConnectionManager>,
    stream_name: String,
    max_length: i64,
    append_timeout: Duration,
}

impl StreamProducer {
    /// Create a producer from a `TopicDef`.
    ///
    /// This is the recommended constructor as it keeps the stream name and
    /// trim length consistent with the topic's consumers.
    pub fn from_topic<T: TopicDef>(redis: ConnectionManager) -> Self {
        Self {
            redis: Arc::new(redis),
            stream_name: T::STREAM_NAME.to_string(),
            max_length: T::MAX_LENGTH,
            append_timeout: DEFAULT_APPEND_TIMEOUT,
        }
    }

    /// Create a producer with an explicit stream name.
    pub fn new(redis: ConnectionManager, stream_name: impl Into<String>) -> Self {
        Self {
            redis: Arc::new(redis),
            stream_name: stream_name.into(),
            max_length: 100_000,
            append_timeout: DEFAULT_APPEND_TIMEOUT,
        }
    }

    /// Bound how long `send` may block on broker acknowledgment.
    pub fn with_append_timeout(mut self, timeout: Duration) -> Self {
        self.append_timeout = timeout;
        self
    }

    /// Get the stream name.
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Append an event, blocking until the broker acknowledges the write
    /// or the configured timeout elapses.
    ///
    /// Returns the Redis stream entry ID.
    pub async fn send<J: Serialize>(&self, event: &J) -> Result<String, StreamError> {
        let mut conn = (*self.redis).clone();

        let event_json = serde_json::to_string(event)?;

        // XADD with MAXLEN ~ for approximate trimming (more efficient)
        let mut cmd = redis::cmd("XADD");
        cmd.arg(&self.stream_name)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg("event") // Field name matches what StreamConsumer expects
            .arg(&event_json);
        let append = cmd.query_async::<String>(&mut conn);

        let stream_id = tokio::time::timeout(self.append_timeout, append)
            .await
            .map_err(|_| StreamError::AppendTimeout {
                stream: self.stream_name.clone(),
                timeout_ms: self.append_timeout.as_millis() as u64,
            })??;

        debug!(
            stream = %self.stream_name,
            stream_id = %stream_id,
            "Appended event"
        );

        Ok(stream_id)
    }
}
