//! Switch-to-latest task slot.

use std::future::Future;

use tokio::task::JoinHandle;

/// Holds at most one in-flight task.
///
/// Starting a task aborts the previous one and bumps the generation. Tasks
/// tag their results with the generation they were started under; results
/// whose generation is no longer current are stale and must be dropped, which
/// also covers results sent just before the abort landed.
#[derive(Debug, Default)]
pub struct LatestTask {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl LatestTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the current task and spawn `make(generation)` in its place.
    ///
    /// Returns the generation of the new task.
    pub fn replace<F, Fut>(&mut self, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        self.handle = Some(tokio::spawn(make(generation)));
        generation
    }

    /// Abort the current task, if any, and invalidate its results.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Whether a result tagged with `generation` belongs to the latest task
    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }

    /// Whether the latest task has not been cancelled or finished
    /// through `cancel`
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for LatestTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_new_has_nothing_current() {
        let task = LatestTask::new();
        assert!(!task.is_current(0));
        assert!(!task.is_pending());
    }

    #[tokio::test]
    async fn test_replace_bumps_generation() {
        let mut task = LatestTask::new();
        let first = task.replace(|_| async {});
        let second = task.replace(|_| async {});
        assert!(second > first);
        assert!(!task.is_current(first));
        assert!(task.is_current(second));
    }

    #[tokio::test]
    async fn test_replace_aborts_previous() {
        let (tx, mut rx) = mpsc::channel::<u64>(4);
        let mut task = LatestTask::new();

        let slow_tx = tx.clone();
        task.replace(move |generation| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = slow_tx.send(generation).await;
        });
        let latest = task.replace(move |generation| async move {
            let _ = tx.send(generation).await;
        });

        assert_eq!(rx.recv().await, Some(latest));
        // The aborted task dropped its sender, so the channel closes
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_cancel_invalidates_current() {
        let mut task = LatestTask::new();
        let generation = task.replace(|_| std::future::pending());
        assert!(task.is_pending());
        assert!(task.is_current(generation));

        task.cancel();
        assert!(!task.is_pending());
        assert!(!task.is_current(generation));
    }
}
