use async_trait::async_trait;

use super::errors::CounterError;

/// Durable storage for the single counter.
///
/// Implementations guarantee that `increment_and_get` is linearizable and
/// all-or-nothing: on error the stored value is unchanged.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create the counter with value 0 if it does not exist. Never resets an existing value.
    async fn ensure_initialized(&self) -> Result<(), CounterError>;
    async fn read(&self) -> Result<i64, CounterError>;
    /// Add one and return the new value.
    async fn increment_and_get(&self) -> Result<i64, CounterError>;
}

/// In-memory store with a switchable outage, for tests and benchmarks
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct MockCounterStore {
        value: Mutex<Option<i64>>,
        available: AtomicBool,
        init_creates_row: bool,
        init_calls: AtomicUsize,
        increment_calls: AtomicUsize,
    }

    impl Default for MockCounterStore {
        fn default() -> Self {
            Self {
                value: Mutex::new(None),
                available: AtomicBool::new(true),
                init_creates_row: true,
                init_calls: AtomicUsize::new(0),
                increment_calls: AtomicUsize::new(0),
            }
        }
    }

    impl MockCounterStore {
        /// Store that already holds `value`.
        pub fn with_value(value: i64) -> Self {
            Self { value: Mutex::new(Some(value)), ..Default::default() }
        }

        /// Store whose `ensure_initialized` reports success without creating the row.
        pub fn with_broken_init() -> Self {
            Self { init_creates_row: false, ..Default::default() }
        }

        pub fn set_available(&self, available: bool) {
            self.available.store(available, Ordering::SeqCst);
        }

        /// Current value without going through the outage switch.
        pub fn peek(&self) -> Option<i64> {
            *self.value.lock().unwrap()
        }

        pub fn init_calls(&self) -> usize {
            self.init_calls.load(Ordering::SeqCst)
        }

        pub fn increment_calls(&self) -> usize {
            self.increment_calls.load(Ordering::SeqCst)
        }

        fn check_available(&self) -> Result<(), CounterError> {
            if self.available.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(CounterError::StorageUnavailable("mock storage offline".into()))
            }
        }
    }

    #[async_trait]
    impl CounterStore for MockCounterStore {
        async fn ensure_initialized(&self) -> Result<(), CounterError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.check_available()?;
            if self.init_creates_row {
                let mut value = self.value.lock().unwrap();
                value.get_or_insert(0);
            }
            Ok(())
        }

        async fn read(&self) -> Result<i64, CounterError> {
            self.check_available()?;
            self.value.lock().unwrap().ok_or(CounterError::NotInitialized)
        }

        async fn increment_and_get(&self) -> Result<i64, CounterError> {
            self.increment_calls.fetch_add(1, Ordering::SeqCst);
            let mut value = self.value.lock().unwrap();
            let current = value.ok_or(CounterError::NotInitialized)?;
            let next = current + 1;
            // "commit" only while storage is up
            self.check_available()?;
            *value = Some(next);
            Ok(next)
        }
    }
}
