//! Event Bus over Redis Streams
//!
//! An ordered, durable, replayable log abstraction:
//!
//! - **Topics**: each topic is a single Redis stream, so ordering is total
//!   across all producers of that topic.
//! - **Producers**: `StreamProducer` appends events with a bounded,
//!   synchronous (awaited) XADD so callers know their event is durably
//!   queued before they return.
//! - **Consumer groups**: `StreamConsumer` reads through a named consumer
//!   group. With a single stream, one group member receives messages at a
//!   time, which gives natural mutual exclusion for singleton consumers.
//! - **Earliest-offset replay**: consumer groups are created at id `0`,
//!   so a group with no prior acknowledged offset replays the entire
//!   retained history on first connect.
//!
//! ## Example
//!
//! ```ignore
//! use stream_bus::{ConsumerConfig, StreamConsumer, StreamProducer, TopicDef};
//!
//! struct MyTopic;
//! impl TopicDef for MyTopic {
//!     const STREAM_NAME: &'static str = "my_topic";
//!     const CONSUMER_GROUP: &'static str = "my-consumer-group";
//! }
//!
//! let producer = StreamProducer::from_topic::<MyTopic>(redis.clone());
//! producer.send(&event).await?;
//!
//! let consumer = StreamConsumer::new(redis, ConsumerConfig::from_topic::<MyTopic>());
//! consumer.ensure_group().await?;
//! let events = consumer.read_new::<MyEvent>().await?;
//! ```

mod config;
mod consumer;
mod error;
mod event;
mod producer;
mod topic;

pub use config::ConsumerConfig;
pub use consumer::StreamConsumer;
pub use error::StreamError;
pub use event::StreamEvent;
pub use producer::StreamProducer;
pub use topic::TopicDef;
