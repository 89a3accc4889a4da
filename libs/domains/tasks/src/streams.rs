//! Stream definition for the tasks domain.

use stream_bus::TopicDef;

/// The task change-event topic.
///
/// A single stream, so event ordering is total across all producers.
/// All relay instances share one consumer group, which means only one of
/// them actively receives events at a time, so the relay role needs no
/// extra coordination.
pub struct TaskEventTopic;

impl TopicDef for TaskEventTopic {
    /// Stream name for task change events.
    const STREAM_NAME: &'static str = "tasks_topic";

    /// Consumer group shared by all relay instances.
    const CONSUMER_GROUP: &'static str = "task-consumer-group";
}
