//! crates/nextdoor_core/src/schema.rs
//!
//! Turns loosely-typed JSON (a stored document or an admin payload) into a
//! well-formed `TherapySnapshot`. Stored documents are classified into a
//! schema version and upgraded once here, so nothing downstream ever sees the
//! legacy single-series shape.

use serde_json::{json, Map, Value};

use crate::domain::{default_x_labels, TherapySnapshot, DEFAULT_X_LABELS};

/// A legacy series needs at least this many usable points to be migrated.
pub const LEGACY_MIN_POINTS: usize = 4;

/// Added to the sampled legacy values to derive DT from SE. DT sits below SE
/// for the first three points and crosses just above it at T3.
const LEGACY_DT_OFFSETS: [f64; 4] = [-2.0, -0.5, -0.3, 0.2];

const CURRENT_SERIES_FIELDS: [&str; 3] = ["xLabels", "dt", "se"];

//=========================================================================================
// Schema Versions
//=========================================================================================

/// A stored document, tagged by the shape it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotDocument {
    /// Single generic series (`series: [{t, v}]`). `values` holds the finite
    /// `v` entries in order.
    LegacyV0 {
        fields: Map<String, Value>,
        values: Vec<f64>,
    },
    /// Two-group model (`xLabels`, `dt`, `se`), possibly partial.
    CurrentV1(Map<String, Value>),
}

impl SnapshotDocument {
    /// Classifies a parsed document. Anything that is not an object is
    /// treated as an empty current-format document.
    pub fn detect(raw: Value) -> Self {
        let fields = match raw {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let has_current = CURRENT_SERIES_FIELDS
            .iter()
            .any(|key| present(&fields, key).is_some());

        if !has_current {
            if let Some(values) = legacy_values(&fields) {
                return Self::LegacyV0 { fields, values };
            }
        }
        Self::CurrentV1(fields)
    }

    /// Rewrites the document into the current field set.
    pub fn upgrade(self) -> Map<String, Value> {
        match self {
            Self::CurrentV1(fields) => fields,
            Self::LegacyV0 { mut fields, values } => {
                let se = sample_four(&values);
                let dt: Vec<f64> = se
                    .iter()
                    .zip(LEGACY_DT_OFFSETS)
                    .map(|(v, offset)| v + offset)
                    .collect();

                fields.remove("series");
                fields.insert("xLabels".to_string(), json!(DEFAULT_X_LABELS));
                fields.insert("dt".to_string(), json!(dt));
                fields.insert("se".to_string(), json!(se));
                fields
            }
        }
    }
}

fn legacy_values(fields: &Map<String, Value>) -> Option<Vec<f64>> {
    let points = fields.get("series")?.as_array()?;
    if points.len() < LEGACY_MIN_POINTS {
        return None;
    }
    let values: Vec<f64> = points
        .iter()
        .filter_map(|point| point.get("v"))
        .filter_map(coerce_number)
        .collect();
    (values.len() >= LEGACY_MIN_POINTS).then_some(values)
}

/// Picks the values at roughly 0%, 33%, 66% and 100% of the series.
fn sample_four(values: &[f64]) -> [f64; 4] {
    let n = values.len();
    let pick = |i: usize| values[i.min(n - 1)];
    [
        pick(0),
        pick((n as f64 * 0.33).floor() as usize),
        pick((n as f64 * 0.66).floor() as usize),
        pick(n - 1),
    ]
}

//=========================================================================================
// Resolution and Normalization
//=========================================================================================

/// Builds a snapshot from a stored document: upgrade, merge over `defaults`,
/// coerce, normalize.
pub fn from_stored(raw: Value, defaults: TherapySnapshot) -> TherapySnapshot {
    let fields = SnapshotDocument::detect(raw).upgrade();
    normalize_lengths(resolve(&fields, defaults))
}

/// Builds a snapshot from an admin payload. Payloads are never migrated.
pub fn from_candidate(fields: &Map<String, Value>, defaults: TherapySnapshot) -> TherapySnapshot {
    normalize_lengths(resolve(fields, defaults))
}

/// Merges `fields` over `defaults`, coercing each present field.
/// `null` counts as absent.
fn resolve(fields: &Map<String, Value>, defaults: TherapySnapshot) -> TherapySnapshot {
    let text = |key: &str, fallback: String| {
        present(fields, key).and_then(coerce_text).unwrap_or(fallback)
    };
    let number = |key: &str, fallback: f64| {
        present(fields, key).and_then(coerce_number).unwrap_or(fallback)
    };

    TherapySnapshot {
        caption: text("caption", defaults.caption),
        is_live: present(fields, "isLive").map(truthy).unwrap_or(defaults.is_live),
        bias_pct: number("biasPct", defaults.bias_pct),
        adherence_pct: number("adherencePct", defaults.adherence_pct),
        sessions_done: number("sessionsDone", defaults.sessions_done),
        updated_at: text("updatedAt", defaults.updated_at),
        x_labels: present(fields, "xLabels")
            .map(text_array)
            .unwrap_or(defaults.x_labels),
        dt: present(fields, "dt").map(number_array).unwrap_or(defaults.dt),
        se: present(fields, "se").map(number_array).unwrap_or(defaults.se),
    }
}

/// Enforces `len(dt) == len(se) == len(x_labels)`.
///
/// Empty labels are replaced by the default set; `dt`/`se` are truncated or
/// padded with their last value (`0` when empty).
pub fn normalize_lengths(mut snapshot: TherapySnapshot) -> TherapySnapshot {
    if snapshot.x_labels.is_empty() {
        snapshot.x_labels = default_x_labels();
    }
    let n = snapshot.x_labels.len();
    fit_to(&mut snapshot.dt, n);
    fit_to(&mut snapshot.se, n);
    snapshot
}

fn fit_to(values: &mut Vec<f64>, len: usize) {
    values.truncate(len);
    let fill = values.last().copied().unwrap_or(0.0);
    values.resize(len, fill);
}

//=========================================================================================
// Coercion Helpers
//=========================================================================================

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

/// Best-effort numeric coercion. Returns `None` for values that have no
/// finite numeric reading.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Strings pass through; numbers and booleans are rendered as text.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn number_array(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(coerce_number).collect())
        .unwrap_or_default()
}

fn text_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(coerce_text).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn defaults() -> TherapySnapshot {
        TherapySnapshot::defaults_at(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    }

    fn legacy_series(len: usize) -> Value {
        let points: Vec<Value> = (0..len)
            .map(|i| json!({ "t": i, "v": 10.0 + i as f64 }))
            .collect();
        json!({ "caption": "Old chart", "series": points })
    }

    #[test]
    fn detects_legacy_series_with_enough_points() {
        match SnapshotDocument::detect(legacy_series(12)) {
            SnapshotDocument::LegacyV0 { values, .. } => assert_eq!(values.len(), 12),
            other => panic!("expected legacy document, got {:?}", other),
        }
    }

    #[test]
    fn short_legacy_series_is_not_migrated() {
        let doc = SnapshotDocument::detect(legacy_series(3));
        assert!(matches!(doc, SnapshotDocument::CurrentV1(_)));
    }

    #[test]
    fn current_fields_take_precedence_over_series() {
        let mut raw = legacy_series(12);
        raw["xLabels"] = json!(["a", "b"]);
        assert!(matches!(
            SnapshotDocument::detect(raw),
            SnapshotDocument::CurrentV1(_)
        ));
    }

    #[test]
    fn migrates_twelve_point_series_to_four_points() {
        let snap = from_stored(legacy_series(12), defaults());

        // indices 0, 3, 7, 11
        assert_eq!(snap.x_labels, default_x_labels());
        assert_eq!(snap.se, vec![10.0, 13.0, 17.0, 21.0]);
        assert_eq!(snap.dt, vec![10.0 - 2.0, 13.0 - 0.5, 17.0 - 0.3, 21.0 + 0.2]);
        assert!(snap.dt[..3].iter().zip(&snap.se).all(|(dt, se)| dt < se));
        assert!(snap.dt[3] > snap.se[3]);
        assert_eq!(snap.caption, "Old chart");
    }

    #[test]
    fn legacy_points_without_numeric_values_are_skipped() {
        let raw = json!({
            "series": [
                { "t": 0, "v": "x" },
                { "t": 1, "v": 1 },
                { "t": 2, "v": 2 },
                { "t": 3, "v": 3 },
            ]
        });
        // Only three usable values: falls back to defaults.
        let snap = from_stored(raw, defaults());
        assert_eq!(snap.dt, defaults().dt);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let snap = from_stored(json!({ "caption": "Hello" }), defaults());
        let expected = TherapySnapshot {
            caption: "Hello".to_string(),
            ..defaults()
        };
        assert_eq!(snap, expected);
    }

    #[test]
    fn non_object_document_resolves_to_defaults() {
        assert_eq!(from_stored(json!([1, 2, 3]), defaults()), defaults());
        assert_eq!(from_stored(Value::Null, defaults()), defaults());
    }

    #[test]
    fn arrays_drop_entries_that_do_not_coerce() {
        let raw = json!({
            "xLabels": ["a", 2, null, {"k": 1}, true],
            "dt": [1, "2.5", "abc", null, [3]],
            "se": "not an array",
        });
        let snap = from_stored(raw, defaults());

        assert_eq!(snap.x_labels, vec!["a", "2", "true"]);
        assert_eq!(snap.dt, vec![1.0, 2.5, 0.0]);
        assert_eq!(snap.se, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn scalars_are_coerced_or_defaulted() {
        let raw = json!({
            "biasPct": "7.5",
            "adherencePct": "lots",
            "sessionsDone": true,
            "isLive": 0,
            "caption": 42,
        });
        let snap = from_stored(raw, defaults());

        assert_eq!(snap.bias_pct, 7.5);
        assert_eq!(snap.adherence_pct, defaults().adherence_pct);
        assert_eq!(snap.sessions_done, 1.0);
        assert!(!snap.is_live);
        assert_eq!(snap.caption, "42");
    }

    #[test]
    fn empty_labels_are_replaced_not_padded() {
        let fields = json!({ "xLabels": [], "dt": [1, 2], "se": [] });
        let snap = from_candidate(fields.as_object().unwrap(), defaults());

        assert_eq!(snap.x_labels, default_x_labels());
        assert_eq!(snap.dt, vec![1.0, 2.0, 2.0, 2.0]);
        assert_eq!(snap.se, vec![0.0; 4]);
    }

    #[test]
    fn long_series_is_truncated_to_labels() {
        let raw = json!({ "xLabels": ["a", "b"], "dt": [1, 2, 3, 4, 5], "se": [9, 8] });
        let snap = from_stored(raw, defaults());
        assert_eq!(snap.dt, vec![1.0, 2.0]);
        assert_eq!(snap.se, vec![9.0, 8.0]);
    }

    #[test]
    fn short_series_repeats_last_value() {
        let raw = json!({ "xLabels": ["a", "b", "c"], "dt": [4], "se": [1, 2] });
        let snap = from_stored(raw, defaults());
        assert_eq!(snap.dt, vec![4.0, 4.0, 4.0]);
        assert_eq!(snap.se, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn coerce_number_rejects_non_finite() {
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!(" 3 ")), Some(3.0));
        assert_eq!(coerce_number(&json!("")), Some(0.0));
        assert_eq!(coerce_number(&json!({})), None);
    }

    #[test]
    fn truthiness_follows_json_values() {
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!([])));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&Value::Null));
    }
}
