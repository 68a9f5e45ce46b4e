//! Progressive current-week blender.
//!
//! A weekly metric read mid-week is structurally low because most of the
//! week has not happened yet. The blender mixes the partial actual with the
//! forecast from prior weeks, leaning on the forecast early in the week and
//! on the actual once the week is nearly done.
//!
//! Only the last element of a series is ever blended. When no forecast can
//! be produced from the prior weeks the raw actual is returned untouched.

use chrono::{Datelike, Local, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::forecast::{calculate_forecast, DEFAULT_MIN_WEEKS};
use crate::numeric::round1;
use crate::threshold_validation::validate_weekly_series;

// ---------------------------------------------------------------------------
// Blend curve
// ---------------------------------------------------------------------------

pub const CURVE_WORKWEEK: &str = "workweek";
pub const CURVE_FULL_WEEK: &str = "full_week";

/// Day-of-week to actual-weight mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendCurve {
    /// Linear ramp Monday 0% to Friday 100% actual; weekends stay at 100%.
    #[default]
    Workweek,
    /// Linear ramp across all seven days, Monday 0% to Sunday 100%.
    FullWeek,
}

impl BlendCurve {
    /// Convert from the configuration string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            CURVE_WORKWEEK => Ok(Self::Workweek),
            CURVE_FULL_WEEK => Ok(Self::FullWeek),
            _ => Err(format!(
                "Invalid blend curve '{s}'. Must be one of: {CURVE_WORKWEEK}, {CURVE_FULL_WEEK}"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workweek => CURVE_WORKWEEK,
            Self::FullWeek => CURVE_FULL_WEEK,
        }
    }

    /// Weight given to the partial actual on `weekday`, in `[0.0, 1.0]`.
    ///
    /// Monotonically non-decreasing from Monday to Sunday.
    pub fn actual_weight(self, weekday: Weekday) -> f64 {
        let position = weekday.num_days_from_monday() as f64;
        match self {
            Self::Workweek => (position / 4.0).min(1.0),
            Self::FullWeek => position / 6.0,
        }
    }
}

/// Full English name of a weekday, as shown in the blend tooltip.
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Today's weekday in local time.
pub fn current_weekday() -> Weekday {
    Local::now().weekday()
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a current-week value was blended, for UI transparency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendMetadata {
    pub blended_value: f64,
    /// Share of the partial actual, 0-100.
    pub actual_percent: f64,
    /// Share of the forecast, 0-100.
    pub forecast_percent: f64,
    pub day_name: String,
}

/// A weekly series whose last element may have been blended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendedSeries {
    pub values: Vec<f64>,
    /// `None` when blending was skipped for lack of a forecast.
    pub metadata: Option<BlendMetadata>,
}

// ---------------------------------------------------------------------------
// Blending
// ---------------------------------------------------------------------------

/// Blend a partial current-week actual with its forecast for a given day.
pub fn calculate_current_week_blend_at(
    current_week_actual: f64,
    forecast_value: f64,
    weekday: Weekday,
    curve: BlendCurve,
) -> f64 {
    let actual_weight = curve.actual_weight(weekday);
    let forecast_weight = 1.0 - actual_weight;
    actual_weight * current_week_actual + forecast_weight * forecast_value
}

/// Blend a partial current-week actual with its forecast using today's
/// weekday and the default curve.
pub fn calculate_current_week_blend(current_week_actual: f64, forecast_value: f64) -> f64 {
    calculate_current_week_blend_at(
        current_week_actual,
        forecast_value,
        current_weekday(),
        BlendCurve::default(),
    )
}

/// Describe the blend for a given day.
pub fn get_blend_metadata_at(
    current_week_actual: f64,
    forecast_value: f64,
    weekday: Weekday,
    curve: BlendCurve,
) -> BlendMetadata {
    let actual_percent = round1(curve.actual_weight(weekday) * 100.0);
    BlendMetadata {
        blended_value: calculate_current_week_blend_at(
            current_week_actual,
            forecast_value,
            weekday,
            curve,
        ),
        actual_percent,
        forecast_percent: round1(100.0 - actual_percent),
        day_name: day_name(weekday).to_string(),
    }
}

/// Describe the blend using today's weekday and the default curve.
pub fn get_blend_metadata(current_week_actual: f64, forecast_value: f64) -> BlendMetadata {
    get_blend_metadata_at(
        current_week_actual,
        forecast_value,
        current_weekday(),
        BlendCurve::default(),
    )
}

/// Blend the last (in-progress) week of `series` against a forecast built
/// from the prior weeks.
///
/// Zero weeks are dropped from the prior history before forecasting, and at
/// least [`DEFAULT_MIN_WEEKS`] non-zero prior weeks are required whatever
/// `min_weeks` says. When no forecast exists the series comes back
/// unchanged with `metadata: None`.
pub fn blend_series(
    series: &[f64],
    weekday: Weekday,
    curve: BlendCurve,
    min_weeks: usize,
) -> Result<BlendedSeries, CoreError> {
    validate_weekly_series(series, "series")?;

    let Some((&current, prior)) = series.split_last() else {
        return Ok(BlendedSeries {
            values: Vec::new(),
            metadata: None,
        });
    };

    let history: Vec<f64> = prior.iter().copied().filter(|v| *v != 0.0).collect();
    let Some(forecast) = calculate_forecast(&history, min_weeks.max(DEFAULT_MIN_WEEKS))? else {
        return Ok(BlendedSeries {
            values: series.to_vec(),
            metadata: None,
        });
    };

    let metadata = get_blend_metadata_at(current, forecast.forecast_value, weekday, curve);
    let mut values = prior.to_vec();
    values.push(metadata.blended_value);

    Ok(BlendedSeries {
        values,
        metadata: Some(metadata),
    })
}
