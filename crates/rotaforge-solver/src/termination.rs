//! Cooperative cancellation for concurrent solve attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that tells pending work to stop launching.
///
/// Clones share one flag. Setting it never interrupts an optimizer call that
/// is already running; workers check it before starting the next attempt.
///
/// # Example
///
/// ```
/// use rotaforge_solver::StopFlag;
///
/// let flag = StopFlag::new();
/// let worker = flag.clone();
///
/// flag.stop();
/// assert!(worker.is_stopped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
