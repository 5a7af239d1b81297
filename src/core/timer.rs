//! Scoped ownership of a recurring background task

use tokio::task::JoinHandle;

/// Aborts the wrapped task on `cancel()` or drop.
///
/// Every recurring timer in the crate is held through one of these, so
/// tearing down the owner tears down the timer.
#[derive(Debug)]
pub struct TimerGuard {
    handle: Option<JoinHandle<()>>,
    name: &'static str,
}

impl TimerGuard {
    pub fn new(name: &'static str, handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
            name,
        }
    }

    /// Abort the task. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(timer = self.name, "timer cancelled");
        }
    }

    /// True until cancelled or the task finished on its own
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let guard = TimerGuard::new(
            "test",
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        drop(guard);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let mut guard = TimerGuard::new("test", tokio::spawn(std::future::pending::<()>()));
        assert!(guard.is_active());
        guard.cancel();
        guard.cancel();
        assert!(!guard.is_active());
    }
}
