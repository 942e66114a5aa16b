//! Sweep Task
//!
//! Cancellable background task that runs a callback on a fixed interval.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::error::{CacheError, Result};

/// Shortest accepted tick period; tokio rejects a zero interval
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running periodic task.
///
/// The task stops when [`stop`](Sweeper::stop) is called or when the handle is
/// dropped, whichever comes first. It also stops on its own once the callback
/// returns [`ControlFlow::Break`].
#[derive(Debug)]
pub struct Sweeper {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns `tick` onto the current tokio runtime, running it every `interval`.
    ///
    /// The first call happens one full interval after spawning.
    ///
    /// # Errors
    /// Returns [`CacheError::NoRuntime`] when called outside a tokio runtime.
    ///
    /// # Example
    /// ```ignore
    /// let sweeper = Sweeper::spawn(Duration::from_millis(500), move || {
    ///     cache.purge_expired();
    ///     ControlFlow::Continue(())
    /// })?;
    /// // Later:
    /// sweeper.stop();
    /// ```
    pub fn spawn<F>(interval: Duration, mut tick: F) -> Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    // Stop wins over a tick that is ready at the same time
                    biased;

                    // Fires on an explicit stop and when the handle is dropped
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        if tick().is_break() {
                            break;
                        }
                    }
                }
            }

            debug!("Sweep task exited");
        });

        Ok(Self { stop_tx, handle })
    }

    /// Signals the task to stop. Never blocks.
    pub fn stop(self) {
        // The receiver is gone if the task already exited on its own
        let _ = self.stop_tx.send(true);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sweeper_ticks_periodically() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let sweeper = Sweeper::spawn(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(280)).await;
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 3, "expected several ticks, got {}", seen);

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_sweeper_stop_ends_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let sweeper = Sweeper::spawn(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .unwrap();
        let task = sweeper.handle.abort_handle();

        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(task.is_finished(), "Task should be finished after stop");
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sweeper_stop_wins_over_ready_tick() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let sweeper = Sweeper::spawn(Duration::from_millis(20), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .unwrap();
        let task = sweeper.handle.abort_handle();
        tokio::task::yield_now().await;

        // Block the only runtime thread so a tick is due when the stop arrives
        std::thread::sleep(Duration::from_millis(60));
        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(task.is_finished());
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sweeper_drop_ends_task() {
        let sweeper = Sweeper::spawn(Duration::from_millis(50), || ControlFlow::Continue(()))
            .unwrap();
        let task = sweeper.handle.abort_handle();

        drop(sweeper);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn test_sweeper_break_ends_task() {
        let sweeper = Sweeper::spawn(Duration::from_millis(20), || ControlFlow::Break(()))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sweeper.is_finished());
    }

    #[test]
    fn test_sweeper_requires_runtime() {
        let result = Sweeper::spawn(Duration::from_millis(50), || ControlFlow::Continue(()));
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }
}
