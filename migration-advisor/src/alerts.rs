//! Threshold alerts over chain health records.
//!
//! Every rule is a "metric below threshold" check. All rules that fire are
//! reported, so a chain down 25% raises the low, medium and high decline
//! alerts together.

use serde::{Deserialize, Serialize};
use tracing::warn;

use migration_core::ChainHealthRecord;

/// Alert severity, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Record field a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertMetric {
    /// 30-day TVL change in percent
    #[serde(rename = "tvl_change_30d_pct")]
    TvlChange30dPct,
    /// Current TVL in USD
    TvlUsd,
}

impl AlertMetric {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TvlChange30dPct => "tvl_change_30d_pct",
            Self::TvlUsd => "tvl_usd",
        }
    }

    fn read(&self, record: &ChainHealthRecord) -> f64 {
        match self {
            Self::TvlChange30dPct => record.change_30d_pct,
            Self::TvlUsd => record.tvl_usd,
        }
    }
}

/// Fires when `metric < threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    /// Rule name
    pub name: String,
    /// Inspected metric
    pub metric: AlertMetric,
    /// Strict upper bound
    pub threshold: f64,
    /// Severity when fired
    pub severity: AlertSeverity,
}

impl AlertRule {
    /// Create a rule.
    pub fn below(
        name: impl Into<String>,
        metric: AlertMetric,
        threshold: f64,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            name: name.into(),
            metric,
            threshold,
            severity,
        }
    }
}

/// Standard rule set.
pub fn default_rules() -> Vec<AlertRule> {
    use AlertMetric::*;
    use AlertSeverity::*;
    vec![
        AlertRule::below("tvl_decline_high", TvlChange30dPct, -20.0, High),
        AlertRule::below("tvl_decline_medium", TvlChange30dPct, -10.0, Medium),
        AlertRule::below("tvl_decline_low", TvlChange30dPct, -5.0, Low),
        AlertRule::below("low_tvl", TvlUsd, 1_000_000.0, High),
        AlertRule::below("very_low_tvl", TvlUsd, 100_000.0, Critical),
    ]
}

/// A fired alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationAlert {
    /// Chain the alert is about
    pub chain: String,
    /// Rule that fired
    pub rule: String,
    /// Severity
    pub severity: AlertSeverity,
    /// Inspected metric
    pub metric: AlertMetric,
    /// Observed value
    pub value: f64,
    /// Rule threshold
    pub threshold: f64,
    /// Human-readable message
    pub message: String,
}

/// Check one record against a rule set.
///
/// Alerts come back most severe first, then by chain and rule name.
pub fn check_alerts(record: &ChainHealthRecord, rules: &[AlertRule]) -> Vec<MigrationAlert> {
    let mut alerts: Vec<MigrationAlert> = rules
        .iter()
        .filter_map(|rule| {
            let value = rule.metric.read(record);
            if value >= rule.threshold {
                return None;
            }
            Some(MigrationAlert {
                chain: record.name.clone(),
                rule: rule.name.clone(),
                severity: rule.severity,
                metric: rule.metric,
                value,
                threshold: rule.threshold,
                message: format!(
                    "{}: {} = {:.1} (threshold: below {})",
                    record.name,
                    rule.metric.as_str(),
                    value,
                    rule.threshold
                ),
            })
        })
        .collect();

    sort_alerts(&mut alerts);
    for alert in alerts.iter().filter(|a| a.severity >= AlertSeverity::High) {
        warn!(
            chain = %alert.chain,
            rule = %alert.rule,
            severity = alert.severity.as_str(),
            "Chain health alert"
        );
    }
    alerts
}

/// Order alerts most severe first, then by chain and rule name.
pub fn sort_alerts(alerts: &mut [MigrationAlert]) {
    alerts.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.chain.cmp(&b.chain))
            .then_with(|| a.rule.cmp(&b.rule))
    });
}
