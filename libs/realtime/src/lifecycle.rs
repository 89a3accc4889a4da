//! Relay lifecycle.
//!
//! The relay starts lazily: nothing consumes the bus until the first
//! client connects. Every connection calls `ensure_running`, which starts
//! the worker if it has never run and restarts it if the previous one
//! faulted. The mutex makes concurrent connects race-free: however many
//! arrive at once, at most one worker is spawned.

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Observed state of the relay worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// No client has connected yet; nothing has been spawned.
    NotStarted,
    /// A worker task is alive.
    Running,
    /// The last worker task ended; the next connect will restart it.
    Faulted,
}

type Spawner = Box<dyn Fn() -> JoinHandle<()> + Send + Sync>;

/// Guards the singleton relay worker.
pub struct RelayLifecycleManager {
    spawner: Spawner,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RelayLifecycleManager {
    /// `spawner` spawns one relay worker task per call; the manager
    /// decides when a call is needed.
    pub fn new(spawner: impl Fn() -> JoinHandle<()> + Send + Sync + 'static) -> Self {
        Self {
            spawner: Box::new(spawner),
            worker: Mutex::new(None),
        }
    }

    /// Start the relay worker unless one is already alive.
    ///
    /// Returns whether this call spawned a worker. Safe to call from any
    /// number of concurrent connections.
    pub async fn ensure_running(&self) -> bool {
        let mut worker = self.worker.lock().await;

        let alive = worker.as_ref().is_some_and(|h| !h.is_finished());
        if alive {
            return false;
        }

        if worker.is_some() {
            warn!("Relay worker had stopped; restarting");
        } else {
            info!("Starting relay worker");
        }

        *worker = Some((self.spawner)());
        true
    }

    pub async fn state(&self) -> RelayState {
        let worker = self.worker.lock().await;
        match worker.as_ref() {
            None => RelayState::NotStarted,
            Some(h) if h.is_finished() => RelayState::Faulted,
            Some(_) => RelayState::Running,
        }
    }
}
