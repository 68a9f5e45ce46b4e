//! Trend-vs-forecast classifier.
//!
//! Compares a current-period value against its forecast and produces the
//! arrow, deviation, status text and colour shown next to each metric.

use serde::{Deserialize, Serialize};

use crate::numeric::{round1, round_to};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Deviation (in percent, either direction) still considered on track.
pub const DEFAULT_ON_TRACK_BAND_PERCENT: f64 = 10.0;

/// Deviation reported when the forecast is zero but the current value is not.
pub const ZERO_FORECAST_DEVIATION_PERCENT: f64 = 100.0;

pub const STATUS_ON_TRACK: &str = "On track";
pub const STATUS_WEEK_STARTING: &str = "Week starting...";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whether larger values of a metric are desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    HigherBetter,
    LowerBetter,
}

/// Arrow shown next to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    #[serde(rename = "↗")]
    Up,
    #[serde(rename = "↘")]
    Down,
    #[serde(rename = "→")]
    Flat,
}

/// Bootstrap text colour class for the trend indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClass {
    #[serde(rename = "text-success")]
    Success,
    #[serde(rename = "text-danger")]
    Danger,
    #[serde(rename = "text-secondary")]
    Secondary,
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Classified comparison of a current value against its forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Signed deviation from forecast in percent, one decimal.
    pub deviation_percent: f64,
    pub status_text: String,
    pub color_class: ColorClass,
    pub is_good: bool,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Signed percentage deviation of `current_value` from `forecast_value`.
///
/// A zero forecast never divides: both zero yields `0.0`, otherwise the
/// deviation is [`ZERO_FORECAST_DEVIATION_PERCENT`] in the direction of
/// the current value.
pub fn deviation_percent(current_value: f64, forecast_value: f64) -> f64 {
    if forecast_value == 0.0 {
        return if current_value == 0.0 {
            0.0
        } else {
            ZERO_FORECAST_DEVIATION_PERCENT.copysign(current_value)
        };
    }
    (current_value - forecast_value) / forecast_value * 100.0
}

/// Classify `current_value` against `forecast_value` with the default
/// ±10% on-track band.
pub fn calculate_trend_vs_forecast(
    current_value: f64,
    forecast_value: f64,
    metric_type: MetricType,
) -> TrendResult {
    calculate_trend_with_band(
        current_value,
        forecast_value,
        metric_type,
        DEFAULT_ON_TRACK_BAND_PERCENT,
    )
}

/// Classify `current_value` against `forecast_value` using a custom
/// on-track band (in percent).
///
/// On track is always good. Outside the band the arrow follows the sign of
/// the deviation and `metric_type` decides whether that sign is good. A
/// zero reading on a higher-is-better metric is a week that has not
/// started yet and is shown neutrally.
pub fn calculate_trend_with_band(
    current_value: f64,
    forecast_value: f64,
    metric_type: MetricType,
    on_track_band_percent: f64,
) -> TrendResult {
    let deviation = deviation_percent(current_value, forecast_value);

    if current_value == 0.0 && metric_type == MetricType::HigherBetter {
        return TrendResult {
            direction: TrendDirection::Down,
            deviation_percent: round1(deviation),
            status_text: STATUS_WEEK_STARTING.to_string(),
            color_class: ColorClass::Secondary,
            is_good: true,
        };
    }

    let shown = round1(deviation);
    if shown.abs() <= on_track_band_percent {
        return TrendResult {
            direction: TrendDirection::Flat,
            deviation_percent: shown,
            status_text: STATUS_ON_TRACK.to_string(),
            color_class: ColorClass::Success,
            is_good: true,
        };
    }

    let increased = deviation > 0.0;
    let is_good = match metric_type {
        MetricType::HigherBetter => increased,
        MetricType::LowerBetter => !increased,
    };
    // Whole percent unless that would round back into the on-track band.
    let whole = round_to(shown.abs(), 0);
    let magnitude = if whole <= on_track_band_percent {
        shown.abs()
    } else {
        whole
    };
    let (direction, status_text) = if increased {
        (TrendDirection::Up, format!("+{magnitude}% above forecast"))
    } else {
        (TrendDirection::Down, format!("-{magnitude}% vs forecast"))
    };

    TrendResult {
        direction,
        deviation_percent: shown,
        status_text,
        color_class: if is_good {
            ColorClass::Success
        } else {
            ColorClass::Danger
        },
        is_good,
    }
}
