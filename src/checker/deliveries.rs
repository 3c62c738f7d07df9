// src/checker/deliveries.rs
// =============================================================================
// Webhook POSTs that were handed off instead of awaited.
//
// Link checks and the navigation calls never wait for the webhook: each POST
// becomes its own tokio task in a shared JoinSet. A POST that never answers
// stays pending there without holding anything else up.
//
// Before the process exits, drain() gives the pending POSTs a bounded amount
// of time to finish. Whatever is still running after that is aborted.
// =============================================================================

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::warn;

use super::report::DeliveryOutcome;

#[derive(Clone)]
pub struct Deliveries {
    tasks: Arc<Mutex<JoinSet<DeliveryOutcome>>>,
}

impl Default for Deliveries {
    fn default() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }
}

impl Deliveries {
    /// Starts `delivery` in the background. Must be called inside a tokio runtime.
    pub fn spawn<F>(&self, delivery: F)
    where
        F: Future<Output = DeliveryOutcome> + Send + 'static,
    {
        self.lock().spawn(delivery);
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Waits up to `cap` for every handed-off POST and returns how many finished.
    pub async fn drain(&self, cap: Duration) -> usize {
        let mut tasks = std::mem::replace(&mut *self.lock(), JoinSet::new());
        let mut finished = 0;

        let waited = tokio::time::timeout(cap, async {
            while tasks.join_next().await.is_some() {
                finished += 1;
            }
        })
        .await;

        if waited.is_err() {
            warn!(abandoned = tasks.len(), "gave up waiting for broken link reports");
        }
        finished
    }

    // The set stays usable even if a holder of the lock panicked
    fn lock(&self) -> MutexGuard<'_, JoinSet<DeliveryOutcome>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
