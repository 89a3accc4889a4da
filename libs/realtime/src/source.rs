//! Bus-backed event source.

use crate::relay::{EventSource, RelayError};
use async_trait::async_trait;
use domain_tasks::TaskEvent;
use stream_bus::{StreamConsumer, StreamEvent};

/// `EventSource` over a Redis Streams consumer group.
pub struct StreamSource {
    consumer: StreamConsumer,
}

impl StreamSource {
    pub fn new(consumer: StreamConsumer) -> Self {
        Self { consumer }
    }
}

#[async_trait]
impl EventSource for StreamSource {
    async fn prepare(&mut self) -> Result<(), RelayError> {
        Ok(self.consumer.ensure_group().await?)
    }

    async fn next_batch(&mut self) -> Result<Vec<StreamEvent<TaskEvent>>, RelayError> {
        Ok(self.consumer.read_new::<TaskEvent>().await?)
    }

    async fn ack(&mut self, stream_id: &str) -> Result<(), RelayError> {
        Ok(self.consumer.ack(stream_id).await?)
    }
}
