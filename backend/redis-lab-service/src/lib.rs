//! Redis Lab Service
//!
//! REST API over Redis data structures (strings, lists, sets, sorted sets,
//! hashes, HyperLogLog, geo) plus a PostgreSQL-backed product catalog.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
pub use services::{DataStructureStore, ProductService, RedisStore, StoreError};
