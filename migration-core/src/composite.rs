//! Composite scoring.
//!
//! Combines the three sub-scores into feasibility and risk, then maps both
//! onto their bands. Every intermediate value is clamped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::ScoringPolicy;
use crate::types::{clamp_score, MigrationError, Result, SubScore, SCORE_MAX};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Feasibility grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Grade {
    /// Strongly feasible
    A,
    /// Feasible
    B,
    /// Feasible with caveats
    C,
    /// Marginal
    D,
    /// Not feasible
    F,
}

impl Grade {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Risk level, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Whether the level calls for extra launch safeguards.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// The three inputs of the composite scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SubScores {
    /// Comparative chain health (higher is better)
    pub chain_health: SubScore,
    /// Bridge risk (higher is worse)
    pub bridge_risk: SubScore,
    /// Contract complexity (higher is harder)
    pub complexity: SubScore,
}

impl SubScores {
    /// Reject sub-scores that are out of range or non-finite.
    pub fn validate(&self) -> Result<()> {
        self.chain_health.validate()?;
        self.bridge_risk.validate()?;
        self.complexity.validate()
    }
}

/// Final scores, bands, and the sub-scores that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CompositeResult {
    /// Feasibility in [0, 100], higher is better
    pub feasibility_score: f64,
    /// Feasibility band
    pub feasibility_grade: Grade,
    /// Risk in [0, 100], higher is worse
    pub risk_score: f64,
    /// Risk band
    pub risk_level: RiskLevel,
    /// Incident adjustment applied (0 when none was given)
    pub incident_adjustment: f64,
    /// Contributing sub-scores, unmodified
    pub sub_scores: SubScores,
}

/// Composite scorer bound to a policy.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    policy: ScoringPolicy,
}

impl Scorer {
    /// Create a scorer, validating the policy.
    pub fn new(policy: ScoringPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Policy in use.
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Map a feasibility score onto its grade.
    pub fn grade(&self, feasibility: f64) -> Grade {
        let bands = &self.policy.grades;
        if feasibility >= bands.a {
            Grade::A
        } else if feasibility >= bands.b {
            Grade::B
        } else if feasibility >= bands.c {
            Grade::C
        } else if feasibility >= bands.d {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Map a risk score onto its level.
    pub fn risk_level(&self, risk: f64) -> RiskLevel {
        let bands = &self.policy.risk_levels;
        if risk < bands.medium {
            RiskLevel::Low
        } else if risk < bands.high {
            RiskLevel::Medium
        } else if risk < bands.critical {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Combine sub-scores into a composite result.
    pub fn score(
        &self,
        sub_scores: &SubScores,
        incident_adjustment: Option<f64>,
    ) -> Result<CompositeResult> {
        sub_scores.validate()?;
        let incident = incident_adjustment.unwrap_or(0.0);
        if !incident.is_finite() {
            return Err(MigrationError::InvalidInput(format!(
                "incident adjustment must be finite, got {}",
                incident
            )));
        }

        let chain = sub_scores.chain_health.value;
        let bridge = sub_scores.bridge_risk.value;
        let complexity = sub_scores.complexity.value;

        let fw = &self.policy.feasibility;
        let feasibility = clamp_score(
            fw.chain_health * chain
                + fw.bridge * (SCORE_MAX - bridge)
                + fw.complexity * (SCORE_MAX - complexity),
        );
        let feasibility =
            clamp_score(feasibility - incident * self.policy.incident_feasibility_factor);

        let rw = &self.policy.risk;
        let risk = clamp_score(
            rw.bridge * bridge + rw.complexity * complexity + rw.chain_health * (SCORE_MAX - chain),
        );
        let risk = clamp_score(risk + incident);

        let result = CompositeResult {
            feasibility_score: feasibility,
            feasibility_grade: self.grade(feasibility),
            risk_score: risk,
            risk_level: self.risk_level(risk),
            incident_adjustment: incident,
            sub_scores: sub_scores.clone(),
        };

        debug!(
            feasibility = result.feasibility_score,
            grade = result.feasibility_grade.as_str(),
            risk = result.risk_score,
            level = result.risk_level.as_str(),
            incident,
            "Composite score computed"
        );

        Ok(result)
    }
}

/// Score with the default policy.
pub fn score(sub_scores: &SubScores, incident_adjustment: Option<f64>) -> Result<CompositeResult> {
    Scorer::default().score(sub_scores, incident_adjustment)
}
