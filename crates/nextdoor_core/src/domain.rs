//! crates/nextdoor_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! The snapshot serializes to the exact JSON shape the site and the admin
//! editor consume, so field names follow the wire format.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Labels used whenever a snapshot has no time points of its own.
pub const DEFAULT_X_LABELS: [&str; 4] = [
    "T0 (baseline)",
    "T1 (4 weeks)",
    "T2 (8 weeks)",
    "T3 (12 weeks)",
];

pub const DEFAULT_CAPTION: &str = "Preview (mock)";
pub const DEFAULT_IS_LIVE: bool = true;
pub const DEFAULT_BIAS_PCT: f64 = 12.0;
pub const DEFAULT_ADHERENCE_PCT: f64 = 94.0;
pub const DEFAULT_SESSIONS_DONE: f64 = 28.0;
pub const DEFAULT_DT: [f64; 4] = [12.5, 14.5, 15.5, 16.3];
pub const DEFAULT_SE: [f64; 4] = [14.5, 15.0, 16.0, 16.0];

/// The single chart document shown on the homepage and edited in the admin.
///
/// `dt` and `se` hold one value per entry in `x_labels` once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapySnapshot {
    pub caption: String,
    pub is_live: bool,
    pub bias_pct: f64,
    pub adherence_pct: f64,
    pub sessions_done: f64,
    pub updated_at: String,
    pub x_labels: Vec<String>,
    /// Digital-therapeutic cohort.
    pub dt: Vec<f64>,
    /// Standard-education cohort.
    pub se: Vec<f64>,
}

impl TherapySnapshot {
    /// The hard-coded snapshot, stamped with `updated_at`.
    pub fn defaults_at(updated_at: DateTime<Utc>) -> Self {
        Self {
            caption: DEFAULT_CAPTION.to_string(),
            is_live: DEFAULT_IS_LIVE,
            bias_pct: DEFAULT_BIAS_PCT,
            adherence_pct: DEFAULT_ADHERENCE_PCT,
            sessions_done: DEFAULT_SESSIONS_DONE,
            updated_at: iso_timestamp(updated_at),
            x_labels: default_x_labels(),
            dt: DEFAULT_DT.to_vec(),
            se: DEFAULT_SE.to_vec(),
        }
    }

    /// Number of time points on the chart.
    pub fn points(&self) -> usize {
        self.x_labels.len()
    }
}

pub fn default_x_labels() -> Vec<String> {
    DEFAULT_X_LABELS.iter().map(|l| l.to_string()).collect()
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
