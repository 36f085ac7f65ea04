//! Work scheduled to run after a response has been produced.
//!
//! Handlers hand non-critical side effects (notifications, activity
//! touch-ups, cleanup deletes) to [`Deferred`] just before returning. A task
//! runs at most once; its error is logged and never reaches the client.

use std::fmt::Display;
use std::future::Future;

use tokio_util::task::TaskTracker;

#[derive(Clone, Default)]
pub struct Deferred {
    tracker: TaskTracker,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` in the background. `name` identifies it in logs.
    pub fn spawn<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.tracker.spawn(async move {
            match task.await {
                Ok(()) => tracing::debug!(task = name, "deferred task done"),
                Err(e) => tracing::warn!(task = name, error = %e, "deferred task failed"),
            }
        });
    }

    /// Number of tasks still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every task spawned so far has finished, then keep accepting
    /// new ones.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Wait for outstanding tasks during graceful shutdown.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
