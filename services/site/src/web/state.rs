//! services/site/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use nextdoor_core::{SnapshotRepository, SnapshotService, TokenSigner};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing in here changes after startup; the snapshot file is the only
/// mutable resource and lives behind `snapshots`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenSigner,
    pub snapshots: SnapshotService,
}

impl AppState {
    pub fn new(config: Arc<Config>, repo: Arc<dyn SnapshotRepository>) -> Self {
        let tokens = TokenSigner::new(config.admin_cookie_secret.clone());
        Self {
            config,
            tokens,
            snapshots: SnapshotService::new(repo),
        }
    }
}
