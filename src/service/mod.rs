//! Service layer: pool lifecycle orchestration.

pub mod pool_service;

pub use pool_service::PoolService;
