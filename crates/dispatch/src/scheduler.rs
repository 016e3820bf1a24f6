//! Bounded execution of oracle calls.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

use finder_core::{Error, Result};

/// Caps the number of oracle calls in flight, independent of caller
/// concurrency.
///
/// A permit is one worker slot. Submission awaits a free permit, which is the
/// engine's backpressure against the oracle: leaders suspend here when the
/// bound is saturated rather than issuing unbounded concurrent external
/// calls. Each unit of work runs in its own spawned task so a panic inside it
/// is contained and surfaced as an error, and the permit is released on every
/// exit path.
pub struct OracleScheduler {
    slots: Arc<Semaphore>,
}

impl OracleScheduler {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Run one unit of work under the concurrency bound.
    pub async fn run<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::internal("oracle scheduler closed"))?;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            operation().await
        });

        handle.await.map_err(|e| {
            if e.is_panic() {
                Error::internal("oracle unit of work panicked")
            } else {
                Error::internal("oracle unit of work was cancelled")
            }
        })
    }

    /// Free worker slots right now.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}

impl Default for OracleScheduler {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn runs_work_and_returns_value() {
        let scheduler = OracleScheduler::new(2);
        let value = scheduler.run(|| async { 41 + 1 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn panic_is_contained_and_slot_released() {
        let scheduler = Arc::new(OracleScheduler::new(1));

        let result = scheduler.run(|| async { panic!("boom") }).await;
        assert!(matches!(result, Err(Error::Internal(_))));

        // The slot must be usable again after the panic.
        let value = scheduler.run(|| async { 7 }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(scheduler.available_slots(), 1);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_bound() {
        let scheduler = Arc::new(OracleScheduler::new(3));
        let running = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let scheduler = scheduler.clone();
            let running = running.clone();
            let high_water = high_water.clone();
            handles.push(tokio::spawn(async move {
                scheduler
                    .run(move || async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        high_water.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(high_water.load(Ordering::SeqCst) <= 3);
    }
}
