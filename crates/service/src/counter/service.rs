use std::future::Future;
use std::sync::Arc;

use common::types::Money;
use tracing::{error, info, instrument, warn};

use super::errors::{CounterError, ServerFault};
use super::repository::CounterStore;

/// Request handler over a [`CounterStore`]. Holds no state between calls.
///
/// A `NotInitialized` store triggers one `ensure_initialized` and exactly one
/// retry. Storage faults are never retried, so a request advances the counter
/// at most once.
pub struct IncrementService<S: CounterStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CounterStore + ?Sized> Clone for IncrementService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: CounterStore + ?Sized> IncrementService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    /// Advance the counter by one and return the new value.
    ///
    /// # Examples
    /// ```
    /// use service::counter::{IncrementService, repository::mock::MockCounterStore};
    /// use std::sync::Arc;
    /// let svc = IncrementService::new(Arc::new(MockCounterStore::with_value(41)));
    /// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// assert_eq!(rt.block_on(svc.handle_increment()).unwrap().money, 42);
    /// ```
    #[instrument(skip(self))]
    pub async fn handle_increment(&self) -> Result<Money, ServerFault> {
        let money = self.with_init_retry("increment", || self.store.increment_and_get()).await?;
        info!(money, event = "clicked", "counter incremented");
        Ok(Money { money })
    }

    /// Current value of the counter.
    #[instrument(skip(self))]
    pub async fn handle_read(&self) -> Result<Money, ServerFault> {
        let money = self.with_init_retry("read", || self.store.read()).await?;
        Ok(Money { money })
    }

    async fn with_init_retry<F, Fut>(&self, op: &'static str, call: F) -> Result<i64, ServerFault>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<i64, CounterError>>,
    {
        match call().await {
            Ok(v) => Ok(v),
            Err(CounterError::NotInitialized) => {
                warn!(op, event = "counter_not_initialized", "initializing counter and retrying once");
                if let Err(e) = self.store.ensure_initialized().await {
                    error!(op, event = "init_failed", code = e.code(), error = %e, "counter initialization failed");
                    return Err(ServerFault);
                }
                call().await.map_err(|e| {
                    error!(op, event = "retry_failed", code = e.code(), error = %e, "retry after initialization failed");
                    ServerFault
                })
            }
            Err(e) => {
                error!(op, event = "storage_fault", code = e.code(), error = %e, "counter storage failed");
                Err(ServerFault)
            }
        }
    }
}
