//! Snapshot input contract.
//!
//! A snapshot carries per-metric weekly series, oldest first. Series may be
//! given as plain lists or keyed by ISO week label (`2026-W41`); keyed
//! series are ordered by label, which is chronological for ISO weeks.

use std::collections::BTreeMap;
use std::path::Path;

use cadence_core::flow::WorkTypeCounts;
use cadence_core::metrics::MetricKey;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ReportError, ReportResult};

/// Weekly values for one metric as they appear in the JSON payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WeeklyValues {
    List(Vec<f64>),
    ByWeek(BTreeMap<String, f64>),
}

/// Raw snapshot as read from JSON.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    metrics: BTreeMap<MetricKey, WeeklyValues>,
    #[serde(default)]
    remaining_items: Option<f64>,
    #[serde(default)]
    work_type_counts: Option<WorkTypeCounts>,
}

/// A validated snapshot: every series is a plain oldest-first list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub metrics: BTreeMap<MetricKey, Vec<f64>>,
    /// Backlog items still open, for the completion forecast.
    pub remaining_items: Option<f64>,
    pub work_type_counts: Option<WorkTypeCounts>,
}

impl Snapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> ReportResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;

        let metrics = raw
            .metrics
            .into_iter()
            .map(|(key, values)| into_series(key, values).map(|series| (key, series)))
            .collect::<ReportResult<BTreeMap<_, _>>>()?;

        Ok(Self {
            metrics,
            remaining_items: raw.remaining_items,
            work_type_counts: raw.work_type_counts,
        })
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> ReportResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn series(&self, key: MetricKey) -> Option<&[f64]> {
        self.metrics.get(&key).map(Vec::as_slice)
    }
}

fn into_series(key: MetricKey, values: WeeklyValues) -> ReportResult<Vec<f64>> {
    match values {
        WeeklyValues::List(list) => Ok(list),
        WeeklyValues::ByWeek(by_week) => {
            for label in by_week.keys() {
                validate_iso_week_label(label).map_err(|msg| {
                    ReportError::Snapshot(format!("{}: {msg}", key.as_str()))
                })?;
            }
            Ok(by_week.into_values().collect())
        }
    }
}

/// Check that `label` is an ISO week label of the form `YYYY-Www`.
pub fn validate_iso_week_label(label: &str) -> Result<(), String> {
    let well_formed = label.len() == 8 && label.as_bytes()[4..6] == *b"-W";
    if well_formed && NaiveDate::parse_from_str(&format!("{label}-1"), "%G-W%V-%u").is_ok() {
        Ok(())
    } else {
        Err(format!("'{label}' is not an ISO week label (expected YYYY-Www)"))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn list_series_are_kept_in_order() {
        let snapshot = Snapshot::from_json(
            r#"{"metrics": {"deployment_frequency": [3.0, 4.0, 5.0]}, "remaining_items": 42}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.series(MetricKey::DeploymentFrequency),
            Some(&[3.0, 4.0, 5.0][..])
        );
        assert_eq!(snapshot.remaining_items, Some(42.0));
        assert!(snapshot.work_type_counts.is_none());
    }

    #[test]
    fn keyed_series_are_sorted_by_week() {
        let snapshot = Snapshot::from_json(
            r#"{"metrics": {"flow_velocity": {"2026-W02": 8, "2025-W52": 6, "2026-W01": 7}}}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.series(MetricKey::FlowVelocity),
            Some(&[6.0, 7.0, 8.0][..])
        );
    }

    #[test]
    fn bad_week_label_is_rejected() {
        let result = Snapshot::from_json(r#"{"metrics": {"flow_time": {"week one": 3}}}"#);
        assert_matches!(result, Err(ReportError::Snapshot(msg)) if msg.starts_with("flow_time"));
    }

    #[test]
    fn unknown_metric_is_a_json_error() {
        let result = Snapshot::from_json(r#"{"metrics": {"story_points": [1, 2]}}"#);
        assert_matches!(result, Err(ReportError::Json(_)));
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn work_type_counts_default_missing_types() {
        let snapshot =
            Snapshot::from_json(r#"{"work_type_counts": {"feature": 5, "defect": 2}}"#).unwrap();
        let counts = snapshot.work_type_counts.unwrap();
        assert!((counts.feature - 5.0).abs() < 1e-9);
        assert!((counts.risk - 0.0).abs() < 1e-9);
    }

    #[test]
    fn iso_week_labels() {
        assert!(validate_iso_week_label("2026-W41").is_ok());
        assert!(validate_iso_week_label("2020-W53").is_ok());
        assert!(validate_iso_week_label("2026-W54").is_err());
        assert!(validate_iso_week_label("2026-41").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Snapshot::load(Path::new("/nonexistent/cadence/snapshot.json"));
        assert_matches!(result, Err(ReportError::Io(_)));
    }
}
