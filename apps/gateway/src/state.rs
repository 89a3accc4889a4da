//! Application state management.

use realtime::{Broadcaster, RelayLifecycleManager};
use std::sync::Arc;

/// Shared state passed to all request handlers.
///
/// Cloned per handler (inexpensive Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Fan-out hub feeding connected WebSocket clients
    pub broadcaster: Arc<Broadcaster>,
    /// Guardian of the singleton relay worker
    pub relay: Arc<RelayLifecycleManager>,
}
