//! Database connectors shared by the workspace services.
//!
//! Currently this covers Redis, which backs both the task event stream
//! and the per-group task cache.

pub mod common;
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};
