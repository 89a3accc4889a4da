//! Consumer configuration.

use crate::topic::TopicDef;
use uuid::Uuid;

/// Configuration for a stream consumer
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Redis stream name
    pub stream_name: String,

    /// Consumer group name
    pub consumer_group: String,

    /// Unique consumer ID within the group (auto-generated if not provided)
    pub consumer_id: String,

    /// Stream id the group starts from when first created
    pub start_id: String,

    /// Blocking read timeout in milliseconds
    pub block_timeout_ms: u64,

    /// Batch size for reading messages
    pub batch_size: usize,
}

impl ConsumerConfig {
    /// Create a ConsumerConfig from a TopicDef
    pub fn from_topic<T: TopicDef>() -> Self {
        Self {
            stream_name: T::STREAM_NAME.to_string(),
            consumer_group: T::CONSUMER_GROUP.to_string(),
            consumer_id: format!("relay-{}", Uuid::new_v4()),
            start_id: T::START_ID.to_string(),
            block_timeout_ms: 5000,
            batch_size: 10,
        }
    }

    /// Create a ConsumerConfig with explicit values
    pub fn new(stream_name: impl Into<String>, consumer_group: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            consumer_group: consumer_group.into(),
            consumer_id: format!("relay-{}", Uuid::new_v4()),
            start_id: "0".to_string(),
            block_timeout_ms: 5000,
            batch_size: 10,
        }
    }

    /// Set the consumer ID
    pub fn with_consumer_id(mut self, id: impl Into<String>) -> Self {
        self.consumer_id = id.into();
        self
    }

    /// Set the blocking read timeout
    pub fn with_block_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.block_timeout_ms = timeout_ms;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::TopicDef;

    struct TestTopic;
    impl TopicDef for TestTopic {
        const STREAM_NAME: &'static str = "test_topic";
        const CONSUMER_GROUP: &'static str = "test-consumers";
    }

    #[test]
    fn test_from_topic() {
        let config = ConsumerConfig::from_topic::<TestTopic>();

        assert_eq!(config.stream_name, "test_topic");
        assert_eq!(config.consumer_group, "test-consumers");
        assert_eq!(config.start_id, "0");
        assert!(config.consumer_id.starts_with("relay-"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ConsumerConfig::new("my_topic", "my-group")
            .with_consumer_id("relay-1")
            .with_block_timeout_ms(1000)
            .with_batch_size(50);

        assert_eq!(config.consumer_id, "relay-1");
        assert_eq!(config.block_timeout_ms, 1000);
        assert_eq!(config.batch_size, 50);
    }
}
