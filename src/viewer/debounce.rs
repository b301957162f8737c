//! Single-slot cancellable timer for resize debouncing

use std::cell::RefCell;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Fires a callback once the quiet period has elapsed since the last
/// [`schedule`](ResizeDebouncer::schedule) call. Rescheduling discards the
/// previous firing instead of stacking another one.
#[derive(Debug)]
pub struct ResizeDebouncer {
    quiet_period: Duration,
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Restart the timer; `fire` runs after the quiet period unless rescheduled.
    ///
    /// Must be called inside a [`tokio::task::LocalSet`].
    pub fn schedule<F>(&self, fire: F)
    where
        F: FnOnce() + 'static,
    {
        let quiet_period = self.quiet_period;
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(quiet_period).await;
            fire();
        });

        if let Some(previous) = self.pending.replace(Some(handle)) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ResizeDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
