//! Service layer for the clicker counter.
//! - `counter::CounterStore` abstracts durable storage of the single counter.
//! - `counter::IncrementService` turns store results into responses or opaque faults.
//! - Reuses the entity and connection helpers in the `models` crate.

pub mod counter;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
