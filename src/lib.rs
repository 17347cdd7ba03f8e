//! # betpool-server
//!
//! REST API backend for prediction pools: users create pools, share a
//! short join code, and join each other's pools. All durable state lives
//! in PostgreSQL; this service is a thin coordination layer over it.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Auth Extractors (api/auth)
//!     │
//!     ├── PoolService (service/)
//!     ├── JoinCode Generator (domain/)
//!     │
//!     └── PoolStore (persistence/)
//!           ├── PostgresStore (sqlx)
//!           └── MemoryStore (tests, local dev)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
