//! Topic definitions.
//!
//! Each domain implements `TopicDef` to pin its stream name and consumer
//! group in one place, shared by producers and consumers.

/// Topic definition trait.
///
/// # Example
///
/// ```rust,ignore
/// use stream_bus::TopicDef;
///
/// pub struct OrderEvents;
///
/// impl TopicDef for OrderEvents {
///     const STREAM_NAME: &'static str = "orders_topic";
///     const CONSUMER_GROUP: &'static str = "order-consumer-group";
/// }
/// ```
pub trait TopicDef: Send + Sync {
    /// The Redis stream name backing this topic.
    const STREAM_NAME: &'static str;

    /// The consumer group name reading this topic.
    const CONSUMER_GROUP: &'static str;

    /// Maximum stream length before approximate trimming (MAXLEN ~).
    const MAX_LENGTH: i64 = 100_000;

    /// Stream id the consumer group starts from when first created.
    /// `"0"` replays the entire retained history (earliest offset).
    const START_ID: &'static str = "0";

    fn stream_name() -> &'static str {
        Self::STREAM_NAME
    }

    fn consumer_group() -> &'static str {
        Self::CONSUMER_GROUP
    }
}
