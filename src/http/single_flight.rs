//! Single-flight coordination
//!
//! Ensures only one execution of an async operation is in flight at a time.
//! Callers that arrive while it runs await the same shared future and all
//! receive a clone of its output. Once the run finishes the slot is emptied,
//! so the next caller starts a fresh execution.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::{Mutex, PoisonError};

/// Shared in-flight slot for one kind of operation
pub struct SingleFlight<T: Clone> {
    inflight: Mutex<Option<Shared<BoxFuture<'static, T>>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }

    /// Join the running execution, or start one with `start`
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(running) => {
                    tracing::debug!("Joining in-flight operation");
                    running.clone()
                }
                None => {
                    let fresh = start().boxed().shared();
                    *slot = Some(fresh.clone());
                    fresh
                }
            }
        };

        let output = shared.clone().await;

        // Whoever finishes first empties the slot, unless a newer run took it
        let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|running| running.ptr_eq(&shared)) {
            *slot = None;
        }

        output
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let running = self
            .inflight
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false);
        f.debug_struct("SingleFlight")
            .field("running", &running)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_run() {
        let flight = SingleFlight::<u32>::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let start = || {
            let runs = Arc::clone(&runs);
            move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                7
            }
        };

        let (a, b, c) = tokio::join!(
            flight.run(start()),
            flight.run(start()),
            flight.run(start())
        );

        assert_eq!((a, b, c), (7, 7, 7));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_callers_run_again() {
        let flight = SingleFlight::<usize>::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for expected in 1..=2 {
            let runs = Arc::clone(&runs);
            let value = flight
                .run(move || async move { runs.fetch_add(1, Ordering::SeqCst) + 1 })
                .await;
            assert_eq!(value, expected);
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
