//! crates/nextdoor_core/src/snapshot.rs
//!
//! Read/write semantics for the chart snapshot on top of a
//! `SnapshotRepository`.
//!
//! Concurrent writers are not serialized here. The repository's atomic `put`
//! keeps every stored document whole, but two simultaneous writes race and
//! the last one wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{iso_timestamp, TherapySnapshot};
use crate::ports::{PortError, PortResult, SnapshotRepository};
use crate::schema;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct SnapshotService {
    repo: Arc<dyn SnapshotRepository>,
    clock: Clock,
}

impl SnapshotService {
    pub fn new(repo: Arc<dyn SnapshotRepository>) -> Self {
        Self::with_clock(repo, Arc::new(Utc::now))
    }

    /// Uses `clock` for default timestamps and `updatedAt` stamps.
    pub fn with_clock(repo: Arc<dyn SnapshotRepository>, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Returns the current snapshot. Never fails.
    ///
    /// A missing, unreadable or corrupt document is replaced by the defaults,
    /// which are persisted as a best effort. A readable document is never
    /// rewritten.
    pub async fn read(&self) -> TherapySnapshot {
        let defaults = TherapySnapshot::defaults_at((self.clock)());

        match self.repo.get().await {
            Ok(Some(raw)) => return schema::from_stored(raw, defaults),
            Ok(None) => debug!("No snapshot stored yet; writing defaults"),
            Err(e) => warn!("Failed to load snapshot, regenerating defaults: {}", e),
        }

        if let Err(e) = self.persist(&defaults).await {
            warn!("Failed to persist default snapshot: {}", e);
        }
        defaults
    }

    /// Merges `candidate` over the defaults, stamps `updatedAt` and persists.
    /// Storage errors are returned to the caller.
    pub async fn write(&self, candidate: &Map<String, Value>) -> PortResult<TherapySnapshot> {
        let now = (self.clock)();
        let mut snapshot = schema::from_candidate(candidate, TherapySnapshot::defaults_at(now));
        snapshot.updated_at = iso_timestamp(now);

        self.persist(&snapshot).await?;
        debug!(points = snapshot.points(), "Snapshot written");
        Ok(snapshot)
    }

    async fn persist(&self, snapshot: &TherapySnapshot) -> PortResult<()> {
        let document =
            serde_json::to_value(snapshot).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.repo.put(&document).await
    }
}
