//! Metrics aggregation: turns a snapshot into DORA and Flow dashboard tabs.
//!
//! For every metric the last week is treated as in progress. Prior weeks
//! feed the forecast, the in-progress week is blended where the metric
//! calls for it, and the resulting current value is classified against
//! the forecast and graded into a tier. A failure on one metric is recorded
//! on its card and never aborts the rest of the dashboard.

use std::time::Instant;

use cadence_core::blend::{blend_series, day_name, BlendMetadata};
use cadence_core::flow::{
    calculate_flow_load_range_with_tolerance, calculate_work_distribution, flow_load_status,
    FlowLoadRange, WorkDistribution,
};
use cadence_core::forecast::{calculate_forecast, ForecastResult};
use cadence_core::metrics::MetricKey;
use cadence_core::pert::{forecast_completion, CompletionForecast};
use cadence_core::tiers::{
    determine_performance_tier, flow_efficiency_tier, flow_load_tier, flow_time_tier,
    PerformanceTier,
};
use cadence_core::trend::{calculate_trend_with_band, MetricType, TrendResult};
use cadence_core::CoreError;
use chrono::Weekday;
use serde::Serialize;

use crate::config::DashboardOptions;
use crate::snapshot::Snapshot;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the UI needs to render one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub metric: MetricKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub tooltip: &'static str,
    /// Value displayed for the current week (blended when applicable).
    pub current_value: Option<f64>,
    /// Unblended reading for the current week.
    pub raw_value: Option<f64>,
    pub forecast: Option<ForecastResult>,
    pub trend: Option<TrendResult>,
    pub tier: Option<PerformanceTier>,
    pub blend: Option<BlendMetadata>,
    pub load_range: Option<FlowLoadRange>,
    /// Set when the metric could not be computed.
    pub error: Option<String>,
}

impl MetricCard {
    fn empty(metric: MetricKey) -> Self {
        Self {
            metric,
            label: metric.label(),
            unit: metric.unit(),
            tooltip: metric.tooltip(),
            current_value: None,
            raw_value: None,
            forecast: None,
            trend: None,
            tier: None,
            blend: None,
            load_range: None,
            error: None,
        }
    }

    fn unavailable(metric: MetricKey, err: &CoreError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::empty(metric)
        }
    }
}

/// A full dashboard refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Day the in-progress week was blended for.
    pub day_name: &'static str,
    pub dora: Vec<MetricCard>,
    pub flow: Vec<MetricCard>,
    pub distribution: Option<WorkDistribution>,
    pub completion: Option<CompletionForecast>,
}

impl Dashboard {
    pub fn cards(&self) -> impl Iterator<Item = &MetricCard> {
        self.dora.iter().chain(self.flow.iter())
    }

    pub fn card(&self, metric: MetricKey) -> Option<&MetricCard> {
        self.cards().find(|c| c.metric == metric)
    }

    /// Number of cards that failed to compute.
    pub fn unavailable_count(&self) -> usize {
        self.cards().filter(|c| c.error.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Card construction
// ---------------------------------------------------------------------------

/// Build the card for one metric from its weekly series.
///
/// Returns an error only for invalid input (negative or non-finite values);
/// missing history leaves the corresponding fields empty.
pub fn build_metric_card(
    metric: MetricKey,
    values: &[f64],
    options: &DashboardOptions,
    weekday: Weekday,
) -> Result<MetricCard, CoreError> {
    let mut card = MetricCard::empty(metric);

    let Some((&raw, prior)) = values.split_last() else {
        card.tier = tier_for(metric, None, None);
        return Ok(card);
    };

    // Blended metrics forecast from non-zero weeks, matching the blender.
    let history: Vec<f64> = if metric.is_blended() {
        prior.iter().copied().filter(|v| *v != 0.0).collect()
    } else {
        prior.to_vec()
    };
    let forecast = calculate_forecast(&history, options.min_forecast_weeks)?;

    let mut current = raw;
    if metric.is_blended() {
        let blended = blend_series(
            values,
            weekday,
            options.blend_curve,
            options.min_forecast_weeks,
        )?;
        match blended.metadata {
            Some(meta) => {
                current = meta.blended_value;
                card.blend = Some(meta);
            }
            None => {
                tracing::debug!(metric = metric.as_str(), "Not enough history to blend");
            }
        }
    }

    // A week with nothing recorded yet is judged on the raw reading, so the
    // neutral "week starting" trend is not masked by the blend.
    let trend_value = if raw == 0.0 && metric.metric_type() == MetricType::HigherBetter {
        raw
    } else {
        current
    };

    if let Some(f) = &forecast {
        card.trend = Some(calculate_trend_with_band(
            trend_value,
            f.forecast_value,
            metric.metric_type(),
            options.on_track_band_percent,
        ));
        if metric == MetricKey::FlowLoad && f.forecast_value > 0.0 {
            card.load_range = Some(calculate_flow_load_range_with_tolerance(
                f.forecast_value,
                options.flow_load_tolerance_percent,
            )?);
        }
    }

    card.tier = tier_for(metric, Some(current), card.load_range.as_ref());
    card.current_value = Some(current);
    card.raw_value = Some(raw);
    card.forecast = forecast;
    Ok(card)
}

fn tier_for(
    metric: MetricKey,
    value: Option<f64>,
    load_range: Option<&FlowLoadRange>,
) -> Option<PerformanceTier> {
    if let Some(table) = metric.tier_table() {
        return Some(determine_performance_tier(value, table));
    }
    match metric {
        MetricKey::FlowTime => Some(flow_time_tier(value)),
        MetricKey::FlowEfficiency => Some(flow_efficiency_tier(value)),
        MetricKey::FlowLoad => match (value, load_range) {
            (Some(v), Some(range)) => Some(flow_load_tier(flow_load_status(v, range))),
            _ => Some(PerformanceTier::UNKNOWN),
        },
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Build both dashboard tabs from a snapshot.
///
/// Cards appear in catalogue order for the metrics present in the
/// snapshot. Distribution comes from `work_type_counts` rather than a
/// weekly series.
pub fn build_dashboard(
    snapshot: &Snapshot,
    options: &DashboardOptions,
    weekday: Weekday,
) -> Dashboard {
    let started = Instant::now();
    let mut dora = Vec::new();
    let mut flow = Vec::new();

    for metric in MetricKey::ALL {
        let Some(values) = snapshot.series(metric) else {
            continue;
        };
        if metric == MetricKey::FlowDistribution {
            tracing::warn!("Ignoring weekly series for flow_distribution; use work_type_counts");
            continue;
        }

        let card = build_metric_card(metric, values, options, weekday).unwrap_or_else(|err| {
            tracing::warn!(metric = metric.as_str(), error = %err, "Metric unavailable");
            MetricCard::unavailable(metric, &err)
        });

        if metric.is_dora() {
            dora.push(card);
        } else {
            flow.push(card);
        }
    }

    let distribution = snapshot
        .work_type_counts
        .as_ref()
        .and_then(|counts| match calculate_work_distribution(counts) {
            Ok(dist) => dist,
            Err(err) => {
                tracing::warn!(error = %err, "Work distribution unavailable");
                None
            }
        });

    let completion = completion_for(snapshot, options);

    let dashboard = Dashboard {
        day_name: day_name(weekday),
        dora,
        flow,
        distribution,
        completion,
    };

    tracing::info!(
        dora_cards = dashboard.dora.len(),
        flow_cards = dashboard.flow.len(),
        unavailable = dashboard.unavailable_count(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Dashboard built",
    );

    dashboard
}

/// Completion forecast from the remaining backlog and the completed
/// velocity weeks (the in-progress week is excluded).
fn completion_for(snapshot: &Snapshot, options: &DashboardOptions) -> Option<CompletionForecast> {
    let remaining = snapshot.remaining_items?;
    let velocity = snapshot.series(MetricKey::FlowVelocity)?;
    let completed = velocity.split_last().map(|(_, prior)| prior)?;

    match forecast_completion(remaining, completed, options.min_forecast_weeks) {
        Ok(completion) => completion,
        Err(err) => {
            tracing::warn!(error = %err, "Completion forecast unavailable");
            None
        }
    }
}
