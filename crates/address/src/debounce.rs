use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Single-slot delayed task: scheduling replaces whatever is still waiting.
///
/// Dropping the value cancels the pending task, so a timer can never fire
/// against state that has already been torn down.
#[derive(Debug)]
pub struct DebouncedQuery {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedQuery {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once `delay` has elapsed without another `schedule` call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = time::Instant::now() + self.delay;
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            task.await;
        });

        if let Some(previous) = self.slot().replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the pending task. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DebouncedQuery {
    fn drop(&mut self) {
        self.cancel();
    }
}
