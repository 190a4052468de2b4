//! Core types for migration scoring.
//!
//! Every record here is plain data that serializes to JSON, so the transport
//! layer can marshal results without knowing how they were computed.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// 30-day TVL change at or below which a chain is considered declining.
pub const DECLINING_CHANGE_PCT: f64 = -10.0;

/// 30-day TVL change at or above which a chain is considered growing.
pub const GROWING_CHANGE_PCT: f64 = 10.0;

/// Lower bound of every score.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score.
pub const SCORE_MAX: f64 = 100.0;

/// Clamp a score into `[SCORE_MIN, SCORE_MAX]`.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

/// Direction of a chain's TVL over the last 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ChainTrend {
    /// TVL grew by at least `GROWING_CHANGE_PCT`
    Growing,
    /// Neither growing nor declining
    Stable,
    /// TVL fell by at least `DECLINING_CHANGE_PCT`
    Declining,
}

impl ChainTrend {
    /// Derive the trend from a 30-day percentage change.
    pub fn from_change(change_30d_pct: f64) -> Self {
        if change_30d_pct <= DECLINING_CHANGE_PCT {
            Self::Declining
        } else if change_30d_pct >= GROWING_CHANGE_PCT {
            Self::Growing
        } else {
            Self::Stable
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// Health snapshot of a single chain, as supplied by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChainHealthRecord {
    /// Chain name (e.g. "Ethereum")
    pub name: String,
    /// Current total value locked, in USD
    pub tvl_usd: f64,
    /// 30-day TVL change in percent
    pub change_30d_pct: f64,
    /// Number of active protocols on the chain
    pub protocol_count: u32,
    /// Trend derived from `change_30d_pct`
    pub trend: ChainTrend,
}

impl ChainHealthRecord {
    /// Create a validated record, deriving the trend tag.
    pub fn new(
        name: impl Into<String>,
        tvl_usd: f64,
        change_30d_pct: f64,
        protocol_count: u32,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            tvl_usd,
            change_30d_pct,
            protocol_count,
            trend: ChainTrend::from_change(change_30d_pct),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check that the record is well formed.
    ///
    /// Records that arrive through deserialization carry their own trend tag;
    /// it must agree with the one derived from `change_30d_pct`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MigrationError::InvalidInput(
                "chain name must not be empty".to_string(),
            ));
        }
        if !self.tvl_usd.is_finite() || self.tvl_usd < 0.0 {
            return Err(MigrationError::InvalidInput(format!(
                "{}: TVL must be a non-negative number, got {}",
                self.name, self.tvl_usd
            )));
        }
        if !self.change_30d_pct.is_finite() {
            return Err(MigrationError::InvalidInput(format!(
                "{}: 30-day change must be finite, got {}",
                self.name, self.change_30d_pct
            )));
        }
        let derived = ChainTrend::from_change(self.change_30d_pct);
        if derived != self.trend {
            return Err(MigrationError::InvalidInput(format!(
                "{}: trend '{}' disagrees with 30-day change {:.2}% (expected '{}')",
                self.name,
                self.trend.as_str(),
                self.change_30d_pct,
                derived.as_str()
            )));
        }
        Ok(())
    }
}

/// A bounded score with the reasoning that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SubScore {
    /// What this score measures (e.g. "bridge_risk")
    pub name: String,
    /// Score in [0, 100]
    pub value: f64,
    /// Human-readable explanation
    pub rationale: String,
}

impl SubScore {
    /// Create a sub-score, clamping the value into range.
    pub fn new(name: impl Into<String>, value: f64, rationale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: clamp_score(value),
            rationale: rationale.into(),
        }
    }

    /// Check that an externally supplied sub-score is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.value.is_finite() || self.value < SCORE_MIN || self.value > SCORE_MAX {
            return Err(MigrationError::InvalidInput(format!(
                "sub-score '{}' must be within [0, 100], got {}",
                self.name, self.value
            )));
        }
        Ok(())
    }
}

/// Estimated duration in weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EffortRange {
    /// Lower bound
    pub min_weeks: u32,
    /// Upper bound
    pub max_weeks: u32,
}

impl EffortRange {
    /// Create a range; bounds are swapped if given out of order.
    pub fn new(min_weeks: u32, max_weeks: u32) -> Self {
        Self {
            min_weeks: min_weeks.min(max_weeks),
            max_weeks: max_weeks.max(min_weeks),
        }
    }

    /// Sum of two ranges.
    pub fn plus(&self, other: &EffortRange) -> EffortRange {
        EffortRange::new(
            self.min_weeks + other.min_weeks,
            self.max_weeks + other.max_weeks,
        )
    }
}

/// Error types for migration scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MigrationError {
    /// Malformed or missing input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Contract pattern identifier not in the catalog
    #[error("Unknown contract pattern: {id}")]
    UnknownPattern { id: String },

    /// Scoring policy is not internally consistent
    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_cutoffs() {
        assert_eq!(ChainTrend::from_change(-10.0), ChainTrend::Declining);
        assert_eq!(ChainTrend::from_change(-9.99), ChainTrend::Stable);
        assert_eq!(ChainTrend::from_change(9.99), ChainTrend::Stable);
        assert_eq!(ChainTrend::from_change(10.0), ChainTrend::Growing);
    }

    #[test]
    fn test_record_rejects_negative_tvl() {
        let err = ChainHealthRecord::new("Fantom", -1.0, 0.0, 10).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidInput(_)));

        let err = ChainHealthRecord::new("Fantom", f64::NAN, 0.0, 10).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidInput(_)));
    }

    #[test]
    fn test_record_rejects_inconsistent_trend() {
        let mut record = ChainHealthRecord::new("Solana", 1e9, 25.0, 100).unwrap();
        assert_eq!(record.trend, ChainTrend::Growing);

        record.trend = ChainTrend::Declining;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_record_rejects_blank_name() {
        assert!(ChainHealthRecord::new("  ", 1e9, 0.0, 1).is_err());
    }

    #[test]
    fn test_sub_score_clamps() {
        assert_eq!(SubScore::new("x", 140.0, "").value, 100.0);
        assert_eq!(SubScore::new("x", -3.0, "").value, 0.0);

        let raw = SubScore {
            name: "x".to_string(),
            value: 101.0,
            rationale: String::new(),
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_effort_range_orders_bounds() {
        let range = EffortRange::new(8, 4);
        assert_eq!(range.min_weeks, 4);
        assert_eq!(range.max_weeks, 8);
        assert_eq!(range.plus(&EffortRange::new(1, 2)), EffortRange::new(5, 10));
    }
}
