//! PERT three-point estimation and burndown completion forecasts.
//!
//! The weighted velocity forecast is the "most likely" leg; the fastest and
//! slowest recent weeks bound it on either side.

use serde::Serialize;

use crate::error::CoreError;
use crate::forecast::{calculate_forecast, ESTABLISHED_WEEKS};
use crate::numeric::round1;
use crate::threshold_validation::validate_non_negative;

/// PERT expected value and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PertEstimate {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
    pub expected: f64,
    pub std_dev: f64,
}

/// Combine three estimates: `E = (o + 4m + p) / 6`, `SD = (p - o) / 6`.
///
/// Requires `0 <= optimistic <= most_likely <= pessimistic`.
pub fn calculate_pert(
    optimistic: f64,
    most_likely: f64,
    pessimistic: f64,
) -> Result<PertEstimate, CoreError> {
    validate_non_negative(optimistic, "optimistic")?;
    validate_non_negative(most_likely, "most_likely")?;
    validate_non_negative(pessimistic, "pessimistic")?;
    if !(optimistic <= most_likely && most_likely <= pessimistic) {
        return Err(CoreError::Validation(format!(
            "estimates must satisfy optimistic <= most_likely <= pessimistic, \
             got {optimistic}, {most_likely}, {pessimistic}"
        )));
    }

    Ok(PertEstimate {
        optimistic,
        most_likely,
        pessimistic,
        expected: (optimistic + 4.0 * most_likely + pessimistic) / 6.0,
        std_dev: (pessimistic - optimistic) / 6.0,
    })
}

/// Weeks until the remaining backlog is burned down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionForecast {
    pub remaining_items: f64,
    /// Weighted velocity forecast used as the most likely pace.
    pub velocity_forecast: f64,
    pub optimistic_weeks: f64,
    pub most_likely_weeks: f64,
    pub pessimistic_weeks: f64,
    pub expected_weeks: f64,
    pub std_dev_weeks: f64,
}

/// Forecast completion of `remaining_items` from weekly velocity history.
///
/// Returns `Ok(None)` when there is not enough history for a velocity
/// forecast, or when no recent week closed any items.
pub fn forecast_completion(
    remaining_items: f64,
    velocity_history: &[f64],
    min_weeks: usize,
) -> Result<Option<CompletionForecast>, CoreError> {
    validate_non_negative(remaining_items, "remaining_items")?;
    let Some(forecast) = calculate_forecast(velocity_history, min_weeks)? else {
        return Ok(None);
    };

    let window_len = velocity_history.len().min(ESTABLISHED_WEEKS);
    let recent: Vec<f64> = velocity_history[velocity_history.len() - window_len..]
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .collect();
    let (Some(fastest), Some(slowest)) = (
        recent.iter().copied().reduce(f64::max),
        recent.iter().copied().reduce(f64::min),
    ) else {
        return Ok(None);
    };
    if forecast.forecast_value <= 0.0 {
        return Ok(None);
    }

    // A rounded forecast can drift just outside the min/max of the window.
    let likely_velocity = forecast.forecast_value.clamp(slowest, fastest);
    let pert = calculate_pert(
        remaining_items / fastest,
        remaining_items / likely_velocity,
        remaining_items / slowest,
    )?;

    Ok(Some(CompletionForecast {
        remaining_items,
        velocity_forecast: forecast.forecast_value,
        optimistic_weeks: round1(pert.optimistic),
        most_likely_weeks: round1(pert.most_likely),
        pessimistic_weeks: round1(pert.pessimistic),
        expected_weeks: round1(pert.expected),
        std_dev_weeks: round1(pert.std_dev),
    }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::numeric::approx_eq;

    // -- calculate_pert --

    #[test]
    fn pert_formula() {
        let p = calculate_pert(2.0, 4.0, 12.0).unwrap();
        assert!(approx_eq(p.expected, 5.0));
        assert!(approx_eq(p.std_dev, 10.0 / 6.0));
    }

    #[test]
    fn pert_collapses_when_all_equal() {
        let p = calculate_pert(3.0, 3.0, 3.0).unwrap();
        assert!(approx_eq(p.expected, 3.0));
        assert!(approx_eq(p.std_dev, 0.0));
    }

    #[test]
    fn pert_rejects_inverted_estimates() {
        assert_matches!(calculate_pert(5.0, 4.0, 6.0), Err(CoreError::Validation(_)));
        assert!(calculate_pert(1.0, 7.0, 6.0).is_err());
        assert!(calculate_pert(-1.0, 2.0, 3.0).is_err());
    }

    // -- forecast_completion --

    #[test]
    fn completion_from_steady_velocity() {
        let c = forecast_completion(50.0, &[10.0, 10.0, 10.0, 10.0], 2)
            .unwrap()
            .unwrap();
        assert!(approx_eq(c.velocity_forecast, 10.0));
        assert!(approx_eq(c.expected_weeks, 5.0));
        assert!(approx_eq(c.std_dev_weeks, 0.0));
    }

    #[test]
    fn completion_spread_follows_fastest_and_slowest_weeks() {
        let c = forecast_completion(40.0, &[5.0, 10.0, 8.0, 20.0], 2)
            .unwrap()
            .unwrap();
        // Forecast: 0.5 + 2.0 + 2.4 + 8.0 = 12.9 items/week.
        assert!(approx_eq(c.velocity_forecast, 12.9));
        assert!(approx_eq(c.optimistic_weeks, 2.0));
        assert!(approx_eq(c.pessimistic_weeks, 8.0));
        assert!(approx_eq(c.most_likely_weeks, 3.1));
        assert!(c.optimistic_weeks <= c.expected_weeks && c.expected_weeks <= c.pessimistic_weeks);
    }

    #[test]
    fn nothing_remaining_is_zero_weeks() {
        let c = forecast_completion(0.0, &[4.0, 6.0], 2).unwrap().unwrap();
        assert!(approx_eq(c.expected_weeks, 0.0));
    }

    #[test]
    fn no_velocity_is_none() {
        assert_eq!(forecast_completion(10.0, &[0.0, 0.0, 0.0], 2), Ok(None));
    }

    #[test]
    fn short_history_is_none() {
        assert_eq!(forecast_completion(10.0, &[5.0], 2), Ok(None));
    }

    #[test]
    fn negative_remaining_is_rejected() {
        assert!(forecast_completion(-1.0, &[5.0, 6.0], 2).is_err());
    }
}
