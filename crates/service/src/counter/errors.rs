use thiserror::Error;

/// Failures of the counter store.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The database could not be reached, read or written. Nothing was persisted.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The counter row does not exist yet.
    #[error("counter not initialized")]
    NotInitialized,
}

impl CounterError {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        CounterError::StorageUnavailable(e.to_string())
    }

    /// Stable numeric code for logs
    pub fn code(&self) -> u16 {
        match self {
            CounterError::StorageUnavailable(_) => 2001,
            CounterError::NotInitialized => 2002,
        }
    }
}

impl From<models::errors::ModelError> for CounterError {
    fn from(e: models::errors::ModelError) -> Self {
        CounterError::storage(e)
    }
}

/// Opaque failure handed to callers of the increment service.
/// Details are logged, never returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("internal server error")]
pub struct ServerFault;
