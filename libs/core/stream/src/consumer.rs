//! Stream consumer.
//!
//! Reads a topic through a Redis consumer group. The group is created at
//! the topic's start id (`0` = earliest), so a fresh group replays the
//! entire retained history before receiving live events.

use crate::config::ConsumerConfig;
use crate::error::StreamError;
use crate::event::StreamEvent;
use redis::aio::ConnectionManager;
use redis::RedisResult;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

type StreamEntries = Vec<(String, Vec<(String, String)>)>;
type ReadGroupReply = Option<Vec<(String, StreamEntries)>>;

/// Consumer-group reader for a single topic.
pub struct StreamConsumer {
    redis: ConnectionManager,
    config: ConsumerConfig,
}

impl StreamConsumer {
    pub fn new(redis: ConnectionManager, config: ConsumerConfig) -> Self {
        Self { redis, config }
    }

    /// Get the stream name
    pub fn stream_name(&self) -> &str {
        &self.config.stream_name
    }

    /// Get the consumer group
    pub fn consumer_group(&self) -> &str {
        &self.config.consumer_group
    }

    /// Create the consumer group if it doesn't exist yet.
    ///
    /// The group starts at the configured start id, and MKSTREAM creates
    /// the stream itself if no producer has appended to it yet.
    pub async fn ensure_group(&self) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let result: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(&self.config.start_id)
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => {
                info!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    start_id = %self.config.start_id,
                    "Created consumer group"
                );
                Ok(())
            }
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    "Consumer group already exists"
                );
                Ok(())
            }
            Err(e) => Err(StreamError::Redis(e)),
        }
    }

    /// Blocking read of the next batch of unseen events.
    ///
    /// Blocks up to the configured timeout; an empty batch means no events
    /// arrived within it. A payload that fails to decode is an error, not
    /// a skip: the caller owns the decision to die on poison input.
    pub async fn read_new<J: DeserializeOwned>(
        &self,
    ) -> Result<Vec<StreamEvent<J>>, StreamError> {
        let mut conn = self.redis.clone();

        let reply: ReadGroupReply = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id)
            .arg("BLOCK")
            .arg(self.config.block_timeout_ms)
            .arg("COUNT")
            .arg(self.config.batch_size)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">") // Only messages never delivered to this group
            .query_async(&mut conn)
            .await?;

        match reply {
            Some(streams) => {
                let mut events = Vec::new();
                for (_stream_name, entries) in streams {
                    events.extend(parse_entries(entries)?);
                }
                Ok(events)
            }
            // Nil reply: blocking timeout with no new messages
            None => Ok(vec![]),
        }
    }

    /// Acknowledge a processed entry, advancing the group's offset for it.
    pub async fn ack(&self, stream_id: &str) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let _: i64 = redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(stream_id)
            .query_async(&mut conn)
            .await?;

        debug!(stream_id = %stream_id, "Acknowledged event");
        Ok(())
    }
}

/// Decode raw stream entries into events.
///
/// Every entry must carry an `event` field holding the JSON payload.
fn parse_entries<J: DeserializeOwned>(
    entries: StreamEntries,
) -> Result<Vec<StreamEvent<J>>, StreamError> {
    let mut events = Vec::with_capacity(entries.len());

    for (stream_id, fields) in entries {
        let event_json = fields
            .iter()
            .find(|(k, _)| k == "event")
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| {
                StreamError::Serialization(format!(
                    "entry {} is missing the 'event' field",
                    stream_id
                ))
            })?;

        let payload: J = serde_json::from_str(event_json).map_err(|e| {
            StreamError::Serialization(format!("entry {}: {}", stream_id, e))
        })?;

        events.push(StreamEvent::new(stream_id, payload));
    }

    Ok(events)
}
