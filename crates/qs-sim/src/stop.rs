//! Cooperative stop requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Asks a running [`Sim`](crate::Sim) to stop.
///
/// Clones share one flag, so a handle can be moved to another thread (a
/// signal handler, a wall-clock watchdog) while the loop runs.  The loop
/// only looks at the flag between ticks.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
