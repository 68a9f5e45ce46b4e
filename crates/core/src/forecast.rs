//! Weighted forecast calculator.
//!
//! Turns an ordered weekly series (oldest first) into a single
//! forward-looking point forecast. A full window uses fixed linear weights
//! favouring the most recent week; a shorter history falls back to a plain
//! mean and is tagged as still building.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::numeric::round1;
use crate::threshold_validation::{validate_alpha, validate_weekly_series};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Weights applied to the last four weeks, oldest to newest.
pub const WEIGHTED_WINDOW: [f64; 4] = [0.1, 0.2, 0.3, 0.4];

/// Number of weeks required for an established forecast.
pub const ESTABLISHED_WEEKS: usize = WEIGHTED_WINDOW.len();

/// Default minimum number of weeks before any forecast is produced.
pub const DEFAULT_MIN_WEEKS: usize = 2;

// ---------------------------------------------------------------------------
// Confidence enum
// ---------------------------------------------------------------------------

/// How much history backs a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastConfidence {
    /// Fewer than [`ESTABLISHED_WEEKS`] weeks; equal-weight mean.
    Building,
    /// A full weighted window is available.
    Established,
}

impl ForecastConfidence {
    /// Derive confidence from the number of weeks that fed the forecast.
    pub fn from_weeks(weeks: usize) -> Self {
        if weeks >= ESTABLISHED_WEEKS {
            Self::Established
        } else {
            Self::Building
        }
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// A point forecast together with the weights that produced it.
///
/// `weights_applied` always sums to 1.0 and has `weeks_available` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub forecast_value: f64,
    pub confidence: ForecastConfidence,
    pub weeks_available: usize,
    pub weights_applied: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Forecast logic
// ---------------------------------------------------------------------------

/// Weights for a window of `weeks` values, oldest to newest.
///
/// Returns the fixed linear weights for a full window and equal weights
/// otherwise. `weeks` is clamped to [`ESTABLISHED_WEEKS`].
pub fn weights_for(weeks: usize) -> Vec<f64> {
    if weeks >= ESTABLISHED_WEEKS {
        return WEIGHTED_WINDOW.to_vec();
    }
    if weeks == 0 {
        return Vec::new();
    }
    vec![1.0 / weeks as f64; weeks]
}

/// Compute a weighted forecast from historical weekly values.
///
/// Only the last [`ESTABLISHED_WEEKS`] values are used. Returns `Ok(None)`
/// when fewer than `min_weeks` values are available, and a validation
/// error when any value is negative or non-finite.
pub fn calculate_forecast(
    historical_values: &[f64],
    min_weeks: usize,
) -> Result<Option<ForecastResult>, CoreError> {
    validate_weekly_series(historical_values, "historical_values")?;

    if historical_values.is_empty() || historical_values.len() < min_weeks {
        return Ok(None);
    }

    let window_len = historical_values.len().min(ESTABLISHED_WEEKS);
    let window = &historical_values[historical_values.len() - window_len..];
    let weights = weights_for(window_len);

    let raw: f64 = window.iter().zip(&weights).map(|(v, w)| v * w).sum();

    Ok(Some(ForecastResult {
        forecast_value: round1(raw),
        confidence: ForecastConfidence::from_weeks(window_len),
        weeks_available: window_len,
        weights_applied: weights,
    }))
}

/// [`calculate_forecast`] with [`DEFAULT_MIN_WEEKS`].
pub fn calculate_default_forecast(
    historical_values: &[f64],
) -> Result<Option<ForecastResult>, CoreError> {
    calculate_forecast(historical_values, DEFAULT_MIN_WEEKS)
}

/// Exponentially weighted moving average over the whole series.
///
/// Recurrence: `S_0 = x_0`, `S_t = alpha * x_t + (1 - alpha) * S_{t-1}`.
/// Returns `Ok(None)` for an empty series. The result is not rounded.
pub fn calculate_ewma_forecast(series: &[f64], alpha: f64) -> Result<Option<f64>, CoreError> {
    validate_alpha(alpha)?;
    validate_weekly_series(series, "series")?;

    let Some((&first, rest)) = series.split_first() else {
        return Ok(None);
    };

    let smoothed = rest
        .iter()
        .fold(first, |prev, &x| alpha * x + (1.0 - alpha) * prev);
    Ok(Some(smoothed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
