//! Persistence layer: the store seam behind the pool lifecycle service.
//!
//! [`PoolStore`] is the injected store-access interface. [`PostgresStore`]
//! is the production implementation; [`MemoryStore`] backs unit tests and
//! local development without a database. Connection lifecycle (connect,
//! migrate, disconnect) is owned by the process entry point, not by the
//! service.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{JoinLookup, NewPool, PoolStore, StoreError};
