//! Scoring policy: weights and band thresholds for the composite scorer.
//!
//! The defaults reproduce the standard weighting. Operators can override any
//! part through configuration; `validate` keeps overrides coherent.

use serde::{Deserialize, Serialize};

use crate::types::{MigrationError, Result, SCORE_MAX, SCORE_MIN};

#[cfg(feature = "typescript")]
use ts_rs::TS;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the feasibility combination.
///
/// Bridge and complexity enter inverted (100 - value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct FeasibilityWeights {
    /// Weight of the comparative chain health score
    pub chain_health: f64,
    /// Weight of inverted bridge risk
    pub bridge: f64,
    /// Weight of inverted contract complexity
    pub complexity: f64,
}

impl Default for FeasibilityWeights {
    fn default() -> Self {
        Self {
            chain_health: 0.35,
            bridge: 0.30,
            complexity: 0.35,
        }
    }
}

/// Weights of the risk combination.
///
/// Chain health enters inverted (100 - value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct RiskWeights {
    /// Weight of bridge risk
    pub bridge: f64,
    /// Weight of contract complexity
    pub complexity: f64,
    /// Weight of inverted chain health
    pub chain_health: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            bridge: 0.45,
            complexity: 0.30,
            chain_health: 0.25,
        }
    }
}

/// Lower bounds of grades A-D; anything below `d` is F.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct GradeBands {
    /// Lowest score graded A
    pub a: f64,
    /// Lowest score graded B
    pub b: f64,
    /// Lowest score graded C
    pub c: f64,
    /// Lowest score graded D
    pub d: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            a: 85.0,
            b: 70.0,
            c: 55.0,
            d: 40.0,
        }
    }
}

/// Lower bounds of MEDIUM, HIGH and CRITICAL; anything below `medium` is LOW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct RiskBands {
    /// Lowest score rated MEDIUM
    pub medium: f64,
    /// Lowest score rated HIGH
    pub high: f64,
    /// Lowest score rated CRITICAL
    pub critical: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 25.0,
            high: 50.0,
            critical: 75.0,
        }
    }
}

/// Everything the composite scorer needs besides its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct ScoringPolicy {
    /// Feasibility weights
    pub feasibility: FeasibilityWeights,
    /// Risk weights
    pub risk: RiskWeights,
    /// Share of the incident adjustment subtracted from feasibility
    pub incident_feasibility_factor: f64,
    /// Grade thresholds
    pub grades: GradeBands,
    /// Risk level thresholds
    pub risk_levels: RiskBands,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            feasibility: FeasibilityWeights::default(),
            risk: RiskWeights::default(),
            incident_feasibility_factor: 0.5,
            grades: GradeBands::default(),
            risk_levels: RiskBands::default(),
        }
    }
}

impl ScoringPolicy {
    /// Check weights and bands.
    pub fn validate(&self) -> Result<()> {
        check_weights(
            "feasibility",
            &[
                ("chain_health", self.feasibility.chain_health),
                ("bridge", self.feasibility.bridge),
                ("complexity", self.feasibility.complexity),
            ],
        )?;
        check_weights(
            "risk",
            &[
                ("bridge", self.risk.bridge),
                ("complexity", self.risk.complexity),
                ("chain_health", self.risk.chain_health),
            ],
        )?;

        if !(0.0..=1.0).contains(&self.incident_feasibility_factor) {
            return Err(MigrationError::InvalidPolicy(format!(
                "incident_feasibility_factor must be within [0, 1], got {}",
                self.incident_feasibility_factor
            )));
        }

        check_bands(
            "grades",
            &[self.grades.a, self.grades.b, self.grades.c, self.grades.d],
        )?;
        check_bands(
            "risk_levels",
            &[
                self.risk_levels.critical,
                self.risk_levels.high,
                self.risk_levels.medium,
            ],
        )?;
        Ok(())
    }
}

fn check_weights(family: &str, weights: &[(&str, f64)]) -> Result<()> {
    for (name, weight) in weights {
        if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
            return Err(MigrationError::InvalidPolicy(format!(
                "{}.{} must be within [0, 1], got {}",
                family, name, weight
            )));
        }
    }
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(MigrationError::InvalidPolicy(format!(
            "{} weights must sum to 1.0, got {}",
            family, sum
        )));
    }
    Ok(())
}

/// Thresholds must be strictly descending and inside (0, 100].
fn check_bands(family: &str, descending: &[f64]) -> Result<()> {
    for bound in descending {
        if !bound.is_finite() || *bound <= SCORE_MIN || *bound > SCORE_MAX {
            return Err(MigrationError::InvalidPolicy(format!(
                "{} thresholds must be within (0, 100], got {}",
                family, bound
            )));
        }
    }
    if descending.windows(2).any(|pair| pair[0] <= pair[1]) {
        return Err(MigrationError::InvalidPolicy(format!(
            "{} thresholds must be strictly descending, got {:?}",
            family, descending
        )));
    }
    Ok(())
}
