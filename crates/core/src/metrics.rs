//! Dashboard metric catalogue.
//!
//! Canonical metric keys used in snapshot payloads, together with the
//! static per-metric configuration: directionality, unit, whether the
//! current week is blended, tooltip text and DORA tier table.

use serde::{Deserialize, Serialize};

use crate::tiers::{
    TierTable, CHANGE_FAILURE_RATE_TIERS, DEPLOYMENT_FREQUENCY_TIERS, LEAD_TIME_TIERS, MTTR_TIERS,
};
use crate::trend::MetricType;

/// Deployments to production per week.
pub const METRIC_DEPLOYMENT_FREQUENCY: &str = "deployment_frequency";
/// Median hours from first commit to production.
pub const METRIC_LEAD_TIME: &str = "lead_time_for_changes";
/// Percentage of deployments causing a failure in production.
pub const METRIC_CHANGE_FAILURE_RATE: &str = "change_failure_rate";
/// Mean hours to restore service after an incident.
pub const METRIC_MTTR: &str = "mean_time_to_recovery";
/// Items completed per week.
pub const METRIC_FLOW_VELOCITY: &str = "flow_velocity";
/// Days from work started to done.
pub const METRIC_FLOW_TIME: &str = "flow_time";
/// Active time as a percentage of total flow time.
pub const METRIC_FLOW_EFFICIENCY: &str = "flow_efficiency";
/// Items in progress.
pub const METRIC_FLOW_LOAD: &str = "flow_load";
/// Share of completed work per work type.
pub const METRIC_FLOW_DISTRIBUTION: &str = "flow_distribution";

/// Every dashboard metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    DeploymentFrequency,
    #[serde(rename = "lead_time_for_changes")]
    LeadTime,
    ChangeFailureRate,
    #[serde(rename = "mean_time_to_recovery")]
    Mttr,
    FlowVelocity,
    FlowTime,
    FlowEfficiency,
    FlowLoad,
    FlowDistribution,
}

impl MetricKey {
    pub const ALL: [MetricKey; 9] = [
        Self::DeploymentFrequency,
        Self::LeadTime,
        Self::ChangeFailureRate,
        Self::Mttr,
        Self::FlowVelocity,
        Self::FlowTime,
        Self::FlowEfficiency,
        Self::FlowLoad,
        Self::FlowDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => METRIC_DEPLOYMENT_FREQUENCY,
            Self::LeadTime => METRIC_LEAD_TIME,
            Self::ChangeFailureRate => METRIC_CHANGE_FAILURE_RATE,
            Self::Mttr => METRIC_MTTR,
            Self::FlowVelocity => METRIC_FLOW_VELOCITY,
            Self::FlowTime => METRIC_FLOW_TIME,
            Self::FlowEfficiency => METRIC_FLOW_EFFICIENCY,
            Self::FlowLoad => METRIC_FLOW_LOAD,
            Self::FlowDistribution => METRIC_FLOW_DISTRIBUTION,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "Deployment Frequency",
            Self::LeadTime => "Lead Time for Changes",
            Self::ChangeFailureRate => "Change Failure Rate",
            Self::Mttr => "Mean Time to Recovery",
            Self::FlowVelocity => "Flow Velocity",
            Self::FlowTime => "Flow Time",
            Self::FlowEfficiency => "Flow Efficiency",
            Self::FlowLoad => "Flow Load",
            Self::FlowDistribution => "Flow Distribution",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "deployments/week",
            Self::LeadTime | Self::Mttr => "hours",
            Self::ChangeFailureRate | Self::FlowEfficiency | Self::FlowDistribution => "%",
            Self::FlowVelocity => "items/week",
            Self::FlowTime => "days",
            Self::FlowLoad => "items",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "How often code is deployed to production each week.",
            Self::LeadTime => "Time from first commit to running in production.",
            Self::ChangeFailureRate => "Share of deployments that caused a production failure.",
            Self::Mttr => "Average time to restore service after a production incident.",
            Self::FlowVelocity => "Work items completed per week.",
            Self::FlowTime => "Elapsed days from work started to work done.",
            Self::FlowEfficiency => "Active working time as a share of total flow time.",
            Self::FlowLoad => "Work items currently in progress (WIP).",
            Self::FlowDistribution => "Mix of features, defects, risks and debt completed.",
        }
    }

    pub fn metric_type(self) -> MetricType {
        match self {
            Self::DeploymentFrequency | Self::FlowVelocity | Self::FlowEfficiency => {
                MetricType::HigherBetter
            }
            Self::LeadTime
            | Self::ChangeFailureRate
            | Self::Mttr
            | Self::FlowTime
            | Self::FlowLoad
            | Self::FlowDistribution => MetricType::LowerBetter,
        }
    }

    /// Whether the in-progress week is blended against its forecast.
    ///
    /// Ratios and point-in-time counts are already comparable mid-week.
    pub fn is_blended(self) -> bool {
        matches!(
            self,
            Self::DeploymentFrequency
                | Self::LeadTime
                | Self::Mttr
                | Self::FlowVelocity
                | Self::FlowTime
        )
    }

    pub fn is_dora(self) -> bool {
        self.tier_table().is_some()
    }

    /// DORA benchmark table, if this is a DORA metric.
    pub fn tier_table(self) -> Option<&'static TierTable> {
        match self {
            Self::DeploymentFrequency => Some(&DEPLOYMENT_FREQUENCY_TIERS),
            Self::LeadTime => Some(&LEAD_TIME_TIERS),
            Self::ChangeFailureRate => Some(&CHANGE_FAILURE_RATE_TIERS),
            Self::Mttr => Some(&MTTR_TIERS),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_strings() {
        for key in MetricKey::ALL {
            assert_eq!(serde_json::to_value(key).unwrap(), key.as_str());
            assert_eq!(
                serde_json::from_value::<MetricKey>(key.as_str().into()).unwrap(),
                key
            );
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(serde_json::from_value::<MetricKey>("story_points".into()).is_err());
    }

    #[test]
    fn exactly_four_dora_metrics() {
        let dora: Vec<MetricKey> = MetricKey::ALL.into_iter().filter(|k| k.is_dora()).collect();
        assert_eq!(
            dora,
            vec![
                MetricKey::DeploymentFrequency,
                MetricKey::LeadTime,
                MetricKey::ChangeFailureRate,
                MetricKey::Mttr,
            ]
        );
    }

    #[test]
    fn blended_metrics() {
        let blended: Vec<&str> = MetricKey::ALL
            .into_iter()
            .filter(|k| k.is_blended())
            .map(|k| k.as_str())
            .collect();
        assert_eq!(
            blended,
            vec![
                METRIC_DEPLOYMENT_FREQUENCY,
                METRIC_LEAD_TIME,
                METRIC_MTTR,
                METRIC_FLOW_VELOCITY,
                METRIC_FLOW_TIME,
            ]
        );
    }

    #[test]
    fn directionality() {
        assert_eq!(MetricKey::FlowVelocity.metric_type(), MetricType::HigherBetter);
        assert_eq!(MetricKey::Mttr.metric_type(), MetricType::LowerBetter);
    }

    #[test]
    fn every_metric_has_a_tooltip() {
        assert!(MetricKey::ALL.iter().all(|k| !k.tooltip().is_empty()));
    }
}
