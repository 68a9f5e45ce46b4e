//! Flow metric helpers: healthy WIP range and work-type distribution.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::numeric::round1;
use crate::threshold_validation::{validate_non_negative, validate_positive_percent};

// ---------------------------------------------------------------------------
// Flow load
// ---------------------------------------------------------------------------

/// Default ± tolerance around the forecast WIP, in percent.
pub const DEFAULT_FLOW_LOAD_TOLERANCE_PERCENT: f64 = 20.0;

/// Healthy work-in-progress band around a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowLoadRange {
    pub lower: f64,
    pub upper: f64,
}

/// Where the current WIP falls relative to its healthy range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowLoadStatus {
    Underloaded,
    Healthy,
    Overloaded,
}

/// Healthy WIP range of `forecast_value ± tolerance_percent`.
///
/// The forecast must be positive and finite; a zero forecast has no
/// meaningful range.
pub fn calculate_flow_load_range_with_tolerance(
    forecast_value: f64,
    tolerance_percent: f64,
) -> Result<FlowLoadRange, CoreError> {
    if !(forecast_value.is_finite() && forecast_value > 0.0) {
        return Err(CoreError::Validation(format!(
            "forecast_value must be positive, got {forecast_value}"
        )));
    }
    validate_positive_percent(tolerance_percent, "tolerance_percent")?;

    let delta = forecast_value * tolerance_percent / 100.0;
    Ok(FlowLoadRange {
        lower: round1(forecast_value - delta),
        upper: round1(forecast_value + delta),
    })
}

/// Healthy WIP range with the default ±20% tolerance.
pub fn calculate_flow_load_range(forecast_value: f64) -> Result<FlowLoadRange, CoreError> {
    calculate_flow_load_range_with_tolerance(forecast_value, DEFAULT_FLOW_LOAD_TOLERANCE_PERCENT)
}

/// Classify current WIP against its range (bounds inclusive).
pub fn flow_load_status(current_wip: f64, range: &FlowLoadRange) -> FlowLoadStatus {
    if current_wip < range.lower {
        FlowLoadStatus::Underloaded
    } else if current_wip > range.upper {
        FlowLoadStatus::Overloaded
    } else {
        FlowLoadStatus::Healthy
    }
}

// ---------------------------------------------------------------------------
// Work-type distribution
// ---------------------------------------------------------------------------

/// Flow item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Feature,
    Defect,
    Risk,
    Debt,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [Self::Feature, Self::Defect, Self::Risk, Self::Debt];

    /// Recommended share of completed work, inclusive percent bounds.
    pub fn recommended_range(self) -> (f64, f64) {
        match self {
            Self::Feature => (40.0, 70.0),
            Self::Defect => (10.0, 30.0),
            Self::Risk => (0.0, 10.0),
            Self::Debt => (10.0, 20.0),
        }
    }
}

/// Completed item counts per work type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkTypeCounts {
    #[serde(default)]
    pub feature: f64,
    #[serde(default)]
    pub defect: f64,
    #[serde(default)]
    pub risk: f64,
    #[serde(default)]
    pub debt: f64,
}

impl WorkTypeCounts {
    pub fn get(&self, work_type: WorkType) -> f64 {
        match work_type {
            WorkType::Feature => self.feature,
            WorkType::Defect => self.defect,
            WorkType::Risk => self.risk,
            WorkType::Debt => self.debt,
        }
    }

    pub fn total(&self) -> f64 {
        WorkType::ALL.iter().map(|t| self.get(*t)).sum()
    }
}

/// Share of one work type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkTypeShare {
    pub work_type: WorkType,
    pub percent: f64,
    pub within_recommended: bool,
}

/// Work-type distribution, one entry per [`WorkType::ALL`] in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkDistribution {
    pub total_items: f64,
    pub shares: Vec<WorkTypeShare>,
}

impl WorkDistribution {
    /// Whether every work type lies inside its recommended range.
    pub fn is_balanced(&self) -> bool {
        self.shares.iter().all(|s| s.within_recommended)
    }
}

/// Percentage of completed work per type. `Ok(None)` when nothing was
/// completed.
pub fn calculate_work_distribution(
    counts: &WorkTypeCounts,
) -> Result<Option<WorkDistribution>, CoreError> {
    for work_type in WorkType::ALL {
        validate_non_negative(counts.get(work_type), "work_type_counts")?;
    }

    let total = counts.total();
    if total == 0.0 {
        return Ok(None);
    }

    let shares = WorkType::ALL
        .iter()
        .map(|&work_type| {
            let percent = round1(counts.get(work_type) / total * 100.0);
            let (low, high) = work_type.recommended_range();
            WorkTypeShare {
                work_type,
                percent,
                within_recommended: (low..=high).contains(&percent),
            }
        })
        .collect();

    Ok(Some(WorkDistribution {
        total_items: total,
        shares,
    }))
}
