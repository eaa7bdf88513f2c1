//! Counter module: storage abstraction, SeaORM storage and the increment service.
//!
//! Everything that reads or advances the persisted counter goes through
//! [`repository::CounterStore`]; the HTTP layer only ever sees
//! [`service::IncrementService`].

pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use errors::{CounterError, ServerFault};
pub use repository::CounterStore;
pub use service::IncrementService;
