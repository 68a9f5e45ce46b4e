//! Performance-tier classification.
//!
//! DORA metrics are graded against static Elite/High/Medium/Low benchmark
//! tables. Flow metrics use simpler two-threshold helpers. Lookups never
//! fail: anything that cannot be placed degrades to [`TIER_UNKNOWN`].

use serde::Serialize;

use crate::flow::FlowLoadStatus;

// ---------------------------------------------------------------------------
// Tier names and colours
// ---------------------------------------------------------------------------

pub const TIER_ELITE: &str = "Elite";
pub const TIER_HIGH: &str = "High";
pub const TIER_MEDIUM: &str = "Medium";
pub const TIER_LOW: &str = "Low";
pub const TIER_UNKNOWN: &str = "Unknown";

pub const COLOR_SUCCESS: &str = "success";
pub const COLOR_INFO: &str = "info";
pub const COLOR_WARNING: &str = "warning";
pub const COLOR_DANGER: &str = "danger";
pub const COLOR_SECONDARY: &str = "secondary";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A tier badge: display name plus Bootstrap colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceTier {
    pub tier: &'static str,
    pub color: &'static str,
}

impl PerformanceTier {
    pub const UNKNOWN: Self = Self {
        tier: TIER_UNKNOWN,
        color: COLOR_SECONDARY,
    };

    pub fn is_unknown(&self) -> bool {
        self.tier == TIER_UNKNOWN
    }
}

/// How a value is compared against each row's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDirection {
    /// A row matches when `value >= threshold`.
    HigherIsBetter,
    /// A row matches when `value <= threshold`.
    LowerIsBetter,
}

/// One row of a tier table.
#[derive(Debug, Clone, Copy)]
pub struct TierRow {
    pub threshold: f64,
    pub tier: &'static str,
    pub color: &'static str,
}

/// An ordered tier table, best tier first.
#[derive(Debug, Clone, Copy)]
pub struct TierTable {
    pub direction: TierDirection,
    pub rows: &'static [TierRow],
}

impl TierTable {
    fn matches(&self, value: f64, threshold: f64) -> bool {
        match self.direction {
            TierDirection::HigherIsBetter => value >= threshold,
            TierDirection::LowerIsBetter => value <= threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// DORA benchmark tables
// ---------------------------------------------------------------------------

const fn row(threshold: f64, tier: &'static str, color: &'static str) -> TierRow {
    TierRow {
        threshold,
        tier,
        color,
    }
}

/// Deployments per week. Daily or better is Elite.
pub const DEPLOYMENT_FREQUENCY_TIERS: TierTable = TierTable {
    direction: TierDirection::HigherIsBetter,
    rows: &[
        row(7.0, TIER_ELITE, COLOR_SUCCESS),
        row(1.0, TIER_HIGH, COLOR_INFO),
        row(0.25, TIER_MEDIUM, COLOR_WARNING),
        row(0.0, TIER_LOW, COLOR_DANGER),
    ],
};

/// Lead time for changes, in hours.
pub const LEAD_TIME_TIERS: TierTable = TierTable {
    direction: TierDirection::LowerIsBetter,
    rows: &[
        row(24.0, TIER_ELITE, COLOR_SUCCESS),
        row(168.0, TIER_HIGH, COLOR_INFO),
        row(720.0, TIER_MEDIUM, COLOR_WARNING),
        row(f64::INFINITY, TIER_LOW, COLOR_DANGER),
    ],
};

/// Change failure rate, in percent.
pub const CHANGE_FAILURE_RATE_TIERS: TierTable = TierTable {
    direction: TierDirection::LowerIsBetter,
    rows: &[
        row(15.0, TIER_ELITE, COLOR_SUCCESS),
        row(20.0, TIER_HIGH, COLOR_INFO),
        row(30.0, TIER_MEDIUM, COLOR_WARNING),
        row(100.0, TIER_LOW, COLOR_DANGER),
    ],
};

/// Mean time to recovery, in hours.
pub const MTTR_TIERS: TierTable = TierTable {
    direction: TierDirection::LowerIsBetter,
    rows: &[
        row(1.0, TIER_ELITE, COLOR_SUCCESS),
        row(24.0, TIER_HIGH, COLOR_INFO),
        row(168.0, TIER_MEDIUM, COLOR_WARNING),
        row(f64::INFINITY, TIER_LOW, COLOR_DANGER),
    ],
};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Place `value` in `table`, walking rows best to worst.
///
/// Missing, non-finite and negative values, and values no row accepts,
/// return [`PerformanceTier::UNKNOWN`].
pub fn determine_performance_tier(value: Option<f64>, table: &TierTable) -> PerformanceTier {
    let Some(value) = value.filter(|v| v.is_finite() && *v >= 0.0) else {
        return PerformanceTier::UNKNOWN;
    };

    table
        .rows
        .iter()
        .find(|r| table.matches(value, r.threshold))
        .map(|r| PerformanceTier {
            tier: r.tier,
            color: r.color,
        })
        .unwrap_or(PerformanceTier::UNKNOWN)
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Flow efficiency at or above this percentage is healthy.
pub const FLOW_EFFICIENCY_HEALTHY_PERCENT: f64 = 40.0;
/// Flow efficiency at or above this percentage (below healthy) is fair.
pub const FLOW_EFFICIENCY_FAIR_PERCENT: f64 = 25.0;

/// Flow time at or below this many days is fast.
pub const FLOW_TIME_FAST_DAYS: f64 = 7.0;
/// Flow time at or below this many days (above fast) is moderate.
pub const FLOW_TIME_MODERATE_DAYS: f64 = 14.0;

fn two_threshold(
    value: Option<f64>,
    good: f64,
    fair: f64,
    direction: TierDirection,
    names: [&'static str; 3],
) -> PerformanceTier {
    let Some(value) = value.filter(|v| v.is_finite() && *v >= 0.0) else {
        return PerformanceTier::UNKNOWN;
    };
    let passes = |threshold: f64| match direction {
        TierDirection::HigherIsBetter => value >= threshold,
        TierDirection::LowerIsBetter => value <= threshold,
    };
    let (tier, color) = if passes(good) {
        (names[0], COLOR_SUCCESS)
    } else if passes(fair) {
        (names[1], COLOR_WARNING)
    } else {
        (names[2], COLOR_DANGER)
    };
    PerformanceTier { tier, color }
}

/// Tier for flow efficiency (active time / total time, percent).
pub fn flow_efficiency_tier(percent: Option<f64>) -> PerformanceTier {
    two_threshold(
        percent,
        FLOW_EFFICIENCY_HEALTHY_PERCENT,
        FLOW_EFFICIENCY_FAIR_PERCENT,
        TierDirection::HigherIsBetter,
        ["Healthy", "Fair", "Low"],
    )
}

/// Tier for flow time (start to done, days).
pub fn flow_time_tier(days: Option<f64>) -> PerformanceTier {
    two_threshold(
        days,
        FLOW_TIME_FAST_DAYS,
        FLOW_TIME_MODERATE_DAYS,
        TierDirection::LowerIsBetter,
        ["Fast", "Moderate", "Slow"],
    )
}

/// Tier badge for a flow load (WIP) status.
pub fn flow_load_tier(status: FlowLoadStatus) -> PerformanceTier {
    match status {
        FlowLoadStatus::Healthy => PerformanceTier {
            tier: "Healthy",
            color: COLOR_SUCCESS,
        },
        FlowLoadStatus::Underloaded => PerformanceTier {
            tier: "Underloaded",
            color: COLOR_INFO,
        },
        FlowLoadStatus::Overloaded => PerformanceTier {
            tier: "Overloaded",
            color: COLOR_DANGER,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(value: f64, table: &TierTable) -> &'static str {
        determine_performance_tier(Some(value), table).tier
    }

    // -- deployment frequency --

    #[test]
    fn deployment_frequency_bands() {
        assert_eq!(tier(10.0, &DEPLOYMENT_FREQUENCY_TIERS), TIER_ELITE);
        assert_eq!(tier(7.0, &DEPLOYMENT_FREQUENCY_TIERS), TIER_ELITE);
        assert_eq!(tier(3.0, &DEPLOYMENT_FREQUENCY_TIERS), TIER_HIGH);
        assert_eq!(tier(0.5, &DEPLOYMENT_FREQUENCY_TIERS), TIER_MEDIUM);
        assert_eq!(tier(0.1, &DEPLOYMENT_FREQUENCY_TIERS), TIER_LOW);
        assert_eq!(tier(0.0, &DEPLOYMENT_FREQUENCY_TIERS), TIER_LOW);
    }

    // -- lead time --

    #[test]
    fn lead_time_lower_is_better() {
        assert_eq!(tier(2.0, &LEAD_TIME_TIERS), TIER_ELITE);
        assert_eq!(tier(24.0, &LEAD_TIME_TIERS), TIER_ELITE);
        assert_eq!(tier(48.0, &LEAD_TIME_TIERS), TIER_HIGH);
        assert_eq!(tier(500.0, &LEAD_TIME_TIERS), TIER_MEDIUM);
        assert_eq!(tier(5000.0, &LEAD_TIME_TIERS), TIER_LOW);
    }

    // -- change failure rate --

    #[test]
    fn change_failure_rate_bands() {
        assert_eq!(tier(5.0, &CHANGE_FAILURE_RATE_TIERS), TIER_ELITE);
        assert_eq!(tier(18.0, &CHANGE_FAILURE_RATE_TIERS), TIER_HIGH);
        assert_eq!(tier(25.0, &CHANGE_FAILURE_RATE_TIERS), TIER_MEDIUM);
        assert_eq!(tier(64.0, &CHANGE_FAILURE_RATE_TIERS), TIER_LOW);
    }

    #[test]
    fn change_failure_rate_over_hundred_is_unknown() {
        assert!(determine_performance_tier(Some(120.0), &CHANGE_FAILURE_RATE_TIERS).is_unknown());
    }

    // -- mttr --

    #[test]
    fn mttr_bands() {
        assert_eq!(tier(0.5, &MTTR_TIERS), TIER_ELITE);
        assert_eq!(tier(12.0, &MTTR_TIERS), TIER_HIGH);
        assert_eq!(tier(72.0, &MTTR_TIERS), TIER_MEDIUM);
        assert_eq!(tier(400.0, &MTTR_TIERS), TIER_LOW);
    }

    // -- unknown --

    #[test]
    fn unplaceable_values_degrade_to_unknown() {
        for value in [None, Some(f64::NAN), Some(f64::INFINITY), Some(-1.0)] {
            let t = determine_performance_tier(value, &LEAD_TIME_TIERS);
            assert_eq!(t, PerformanceTier::UNKNOWN);
            assert_eq!(t.color, COLOR_SECONDARY);
        }
    }

    #[test]
    fn colours_follow_tier() {
        let elite = determine_performance_tier(Some(8.0), &DEPLOYMENT_FREQUENCY_TIERS);
        assert_eq!(elite.color, COLOR_SUCCESS);
        let low = determine_performance_tier(Some(900.0), &MTTR_TIERS);
        assert_eq!(low.color, COLOR_DANGER);
    }

    // -- flow helpers --

    #[test]
    fn flow_efficiency_thresholds() {
        assert_eq!(flow_efficiency_tier(Some(45.0)).tier, "Healthy");
        assert_eq!(flow_efficiency_tier(Some(40.0)).tier, "Healthy");
        assert_eq!(flow_efficiency_tier(Some(30.0)).tier, "Fair");
        assert_eq!(flow_efficiency_tier(Some(10.0)).tier, "Low");
        assert!(flow_efficiency_tier(None).is_unknown());
    }

    #[test]
    fn flow_time_thresholds() {
        assert_eq!(flow_time_tier(Some(3.0)).tier, "Fast");
        assert_eq!(flow_time_tier(Some(14.0)).tier, "Moderate");
        assert_eq!(flow_time_tier(Some(30.0)).color, COLOR_DANGER);
        assert!(flow_time_tier(Some(f64::NAN)).is_unknown());
    }

    #[test]
    fn flow_load_badges() {
        assert_eq!(flow_load_tier(FlowLoadStatus::Healthy).color, COLOR_SUCCESS);
        assert_eq!(flow_load_tier(FlowLoadStatus::Overloaded).tier, "Overloaded");
        assert_eq!(flow_load_tier(FlowLoadStatus::Underloaded).color, COLOR_INFO);
    }

    #[test]
    fn tier_serializes_with_literal_keys() {
        let json = serde_json::to_value(PerformanceTier::UNKNOWN).unwrap();
        assert_eq!(json, serde_json::json!({"tier": "Unknown", "color": "secondary"}));
    }
}
