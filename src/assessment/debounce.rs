//! Cancellable quiet-period timer for the assessment trigger.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Runs a piece of work after a fixed quiet period. Scheduling again before
/// the period elapses cancels the pending run and restarts the clock; there is
/// no maximum-wait escalation.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        });
        self.pending = Some(task.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
