//! Real-time fan-out
//!
//! The consuming half of the change-propagation pipeline:
//!
//! ```text
//! tasks_topic stream
//!   ↓ (consumer group: task-consumer-group)
//! RelayWorker (singleton per process, managed by RelayLifecycleManager)
//!   ↓
//! Broadcaster::push("/tasks", event)
//!   ↓
//! every connected WebSocket client
//! ```
//!
//! The lifecycle manager starts the relay lazily on the first client
//! connection and restarts it on the next connection after a fault.
//! Delivery to clients is at-least-once: a relay restart may replay
//! events, so clients treat `task_event` frames as hints to refresh,
//! never as an authoritative diff.

mod broadcaster;
mod lifecycle;
mod relay;
mod source;

pub use broadcaster::{Broadcaster, TASKS_CHANNEL};
pub use lifecycle::{RelayLifecycleManager, RelayState};
pub use relay::{EventSource, RelayError, RelayWorker};
pub use source::StreamSource;
