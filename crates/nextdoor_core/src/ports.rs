//! crates/nextdoor_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where the snapshot document actually lives.

use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Stored document is not valid JSON: {0}")]
    Corrupt(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Key-value storage for the one snapshot document.
///
/// There is a single fixed key, so `get`/`put` take no key argument.
/// Implementations must make `put` atomic: a concurrent `get` observes either
/// the previous document or the new one, never a partial write.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn get(&self) -> PortResult<Option<Value>>;

    async fn put(&self, document: &Value) -> PortResult<()>;
}
