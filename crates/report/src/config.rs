use std::path::PathBuf;

use cadence_core::blend::BlendCurve;
use cadence_core::flow::DEFAULT_FLOW_LOAD_TOLERANCE_PERCENT;
use cadence_core::forecast::DEFAULT_MIN_WEEKS;
use cadence_core::trend::DEFAULT_ON_TRACK_BAND_PERCENT;
use chrono::Weekday;
use validator::Validate;

use crate::error::{ReportError, ReportResult};

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Tunables passed to the dashboard builder.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct DashboardOptions {
    pub blend_curve: BlendCurve,
    /// ± deviation (percent) still reported as on track.
    #[validate(range(min = 0.0, max = 100.0))]
    pub on_track_band_percent: f64,
    /// ± tolerance (percent) of the healthy flow load range.
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub flow_load_tolerance_percent: f64,
    /// Weeks of history before a forecast is produced.
    #[validate(range(min = 2))]
    pub min_forecast_weeks: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            blend_curve: BlendCurve::default(),
            on_track_band_percent: DEFAULT_ON_TRACK_BAND_PERCENT,
            flow_load_tolerance_percent: DEFAULT_FLOW_LOAD_TOLERANCE_PERCENT,
            min_forecast_weeks: DEFAULT_MIN_WEEKS,
        }
    }
}

/// Report configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// JSON snapshot to read.
    pub snapshot_path: PathBuf,
    pub options: DashboardOptions,
    /// Weekday used for blending; `None` means today.
    pub weekday: Option<Weekday>,
    pub log_format: LogFormat,
}

impl ReportConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default    |
    /// |-------------------------------|------------|
    /// | `SNAPSHOT_PATH`               | (required) |
    /// | `BLEND_CURVE`                 | `workweek` |
    /// | `ON_TRACK_BAND_PERCENT`       | `10`       |
    /// | `FLOW_LOAD_TOLERANCE_PERCENT` | `20`       |
    /// | `MIN_FORECAST_WEEKS`          | `2`        |
    /// | `REPORT_WEEKDAY`              | today      |
    /// | `LOG_FORMAT`                  | `pretty`   |
    pub fn from_env() -> ReportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("SNAPSHOT_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ReportError::Config("SNAPSHOT_PATH is required".into()))?;

        let defaults = DashboardOptions::default();

        let blend_curve = match lookup("BLEND_CURVE") {
            Some(v) => BlendCurve::from_str_value(v.trim()).map_err(ReportError::Config)?,
            None => defaults.blend_curve,
        };

        let options = DashboardOptions {
            blend_curve,
            on_track_band_percent: parse_or(
                &lookup,
                "ON_TRACK_BAND_PERCENT",
                defaults.on_track_band_percent,
            )?,
            flow_load_tolerance_percent: parse_or(
                &lookup,
                "FLOW_LOAD_TOLERANCE_PERCENT",
                defaults.flow_load_tolerance_percent,
            )?,
            min_forecast_weeks: parse_or(
                &lookup,
                "MIN_FORECAST_WEEKS",
                defaults.min_forecast_weeks,
            )?,
        };
        options
            .validate()
            .map_err(|e| ReportError::Config(e.to_string()))?;

        let weekday = lookup("REPORT_WEEKDAY")
            .map(|v| {
                v.trim().parse::<Weekday>().map_err(|_| {
                    ReportError::Config(format!("REPORT_WEEKDAY '{v}' is not a weekday"))
                })
            })
            .transpose()?;

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ReportError::Config(format!(
                    "LOG_FORMAT '{other}' must be 'pretty' or 'json'"
                )))
            }
        };

        Ok(Self {
            snapshot_path,
            options,
            weekday,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> ReportResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ReportError::Config(format!("{key} has invalid value '{raw}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> ReportResult<ReportConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReportConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_path_is_set() {
        let config = load(&[("SNAPSHOT_PATH", "snapshot.json")]).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("snapshot.json"));
        assert_eq!(config.options, DashboardOptions::default());
        assert_eq!(config.weekday, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn snapshot_path_is_required() {
        assert_matches!(load(&[]), Err(ReportError::Config(_)));
        assert_matches!(load(&[("SNAPSHOT_PATH", "  ")]), Err(ReportError::Config(_)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("SNAPSHOT_PATH", "s.json"),
            ("BLEND_CURVE", "full_week"),
            ("ON_TRACK_BAND_PERCENT", "15"),
            ("FLOW_LOAD_TOLERANCE_PERCENT", "30"),
            ("MIN_FORECAST_WEEKS", "3"),
            ("REPORT_WEEKDAY", "thu"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.options.blend_curve, BlendCurve::FullWeek);
        assert!((config.options.on_track_band_percent - 15.0).abs() < 1e-9);
        assert!((config.options.flow_load_tolerance_percent - 30.0).abs() < 1e-9);
        assert_eq!(config.options.min_forecast_weeks, 3);
        assert_eq!(config.weekday, Some(Weekday::Thu));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("ON_TRACK_BAND_PERCENT", "150")]).is_err());
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("FLOW_LOAD_TOLERANCE_PERCENT", "0")]).is_err());
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("MIN_FORECAST_WEEKS", "1")]).is_err());
    }

    #[test]
    fn unparseable_values_are_rejected() {
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("MIN_FORECAST_WEEKS", "two")]).is_err());
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("BLEND_CURVE", "daily")]).is_err());
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("REPORT_WEEKDAY", "someday")]).is_err());
        assert!(load(&[("SNAPSHOT_PATH", "s"), ("LOG_FORMAT", "xml")]).is_err());
    }
}
