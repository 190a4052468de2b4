//! Contract complexity assessment.
//!
//! The hardest pattern dominates the aggregate: a project with one lending
//! market and nine multisigs is a lending port.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ContractPattern, PatternCatalog};
use crate::platform::{platform_compatibility, ChainFamily, PlatformCompatibility};
use crate::types::{EffortRange, MigrationError, Result, SubScore};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Weight of the hardest pattern in the aggregate difficulty.
pub const DOMINANT_WEIGHT: f64 = 0.7;

/// Weight of the mean difficulty in the aggregate difficulty.
pub const MEAN_WEIGHT: f64 = 0.3;

/// Difficulty (1-10) to sub-score (0-100) multiplier.
pub const DIFFICULTY_SCALE: f64 = 10.0;

/// Weeks added to the floor per pattern beyond the first.
pub const EXTRA_PATTERN_MIN_WEEKS: u32 = 1;

/// Weeks added to the ceiling per pattern beyond the first.
pub const EXTRA_PATTERN_MAX_WEEKS: u32 = 2;

/// Source and target families the pattern catalog is written for.
pub const CATALOG_PLATFORMS: (ChainFamily, ChainFamily) = (ChainFamily::Evm, ChainFamily::Svm);

/// Compatibility difficulty of the catalog's own platform pair.
pub const CATALOG_PAIR_DIFFICULTY: u8 = 80;

/// Coarse difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityLevel {
    /// Bucket a 1-10 difficulty.
    pub fn from_difficulty(difficulty: f64) -> Self {
        let rounded = difficulty.round();
        if rounded <= 3.0 {
            Self::Simple
        } else if rounded <= 6.0 {
            Self::Moderate
        } else if rounded <= 8.0 {
            Self::Complex
        } else {
            Self::VeryComplex
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }
}

/// One recognized pattern in the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PatternAssessment {
    /// Catalog identifier
    pub id: String,
    /// Destination-platform equivalent
    pub equivalent: String,
    /// Porting difficulty, 1-10
    pub difficulty: u8,
    /// Migration notes
    pub notes: String,
    /// Key semantic differences
    pub key_differences: Vec<String>,
}

impl PatternAssessment {
    /// Re-express a catalog assessment for a different platform pair.
    ///
    /// Difficulty scales with the pair's compatibility relative to the
    /// catalog pair, bounded to 1-10. Catalog equivalents and differences are
    /// replaced since they describe a different destination.
    pub fn retarget(&mut self, compatibility: &PlatformCompatibility, target: &str) {
        let scale = compatibility.difficulty as f64 / CATALOG_PAIR_DIFFICULTY as f64;
        self.difficulty = (self.difficulty as f64 * scale).round().clamp(1.0, 10.0) as u8;

        if compatibility.requires_rewrite {
            self.equivalent = format!(
                "Custom {} implementation on {}",
                compatibility.target_family.as_str(),
                target
            );
            self.notes = format!(
                "No catalog mapping for {} targets; design the port from scratch.",
                compatibility.target_family.as_str()
            );
            self.key_differences = Vec::new();
        } else {
            self.equivalent = format!("{} on {}", self.id, target);
            self.notes = "Largely compatible; redeploy with chain-specific config.".to_string();
            self.key_differences = vec![
                "Re-point oracle, bridge and token addresses to target deployments".to_string(),
            ];
        }
    }
}

impl From<&ContractPattern> for PatternAssessment {
    fn from(pattern: &ContractPattern) -> Self {
        Self {
            id: pattern.id.clone(),
            equivalent: pattern.equivalent.clone(),
            difficulty: pattern.difficulty,
            notes: pattern.notes.clone(),
            key_differences: pattern.key_differences.clone(),
        }
    }
}

/// Aggregate complexity of a project's contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ContractAssessment {
    /// Recognized patterns, hardest first
    pub patterns: Vec<PatternAssessment>,
    /// Complexity sub-score (difficulty x 10)
    pub complexity: SubScore,
    /// Estimated porting effort
    pub effort: EffortRange,
    /// Difficulty bucket
    pub level: ComplexityLevel,
    /// Id of the hardest pattern
    pub bottleneck: String,
}

/// Base effort for the hardest pattern's difficulty.
fn base_effort(max_difficulty: u8) -> EffortRange {
    match max_difficulty {
        0..=3 => EffortRange::new(2, 4),
        4..=6 => EffortRange::new(4, 8),
        7..=8 => EffortRange::new(8, 16),
        _ => EffortRange::new(16, 24),
    }
}

/// Estimate porting effort for a set of patterns.
///
/// Returns an empty range for no patterns.
pub fn estimate_effort(patterns: &[PatternAssessment]) -> EffortRange {
    let Some(max) = patterns.iter().map(|p| p.difficulty).max() else {
        return EffortRange::new(0, 0);
    };
    let extra = patterns.len().saturating_sub(1) as u32;
    base_effort(max).plus(&EffortRange::new(
        extra * EXTRA_PATTERN_MIN_WEEKS,
        extra * EXTRA_PATTERN_MAX_WEEKS,
    ))
}

/// Assess contract patterns against the built-in catalog.
pub fn assess_contracts<I, S>(ids: I) -> Result<ContractAssessment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    assess_contracts_with(ids, PatternCatalog::builtin())
}

/// Assess contract patterns against a given catalog.
pub fn assess_contracts_with<I, S>(ids: I, catalog: &PatternCatalog) -> Result<ContractAssessment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let patterns = resolve_patterns(ids, catalog)?;
    Ok(aggregate(patterns))
}

/// Assess contract patterns for a specific source → target move.
///
/// Pairs the catalog is written for are assessed as-is. Any other pair has
/// its patterns retargeted through the platform compatibility table, so an
/// EVM → EVM move is scored as a redeployment rather than a rewrite.
pub fn assess_contracts_for<I, S>(
    ids: I,
    source: &str,
    target: &str,
    catalog: &PatternCatalog,
) -> Result<ContractAssessment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut patterns = resolve_patterns(ids, catalog)?;
    let compatibility = platform_compatibility(source, target);

    if (compatibility.source_family, compatibility.target_family) != CATALOG_PLATFORMS {
        let target = target.trim().to_lowercase();
        for pattern in &mut patterns {
            pattern.retarget(&compatibility, &target);
        }
        debug!(
            difficulty = compatibility.difficulty,
            level = compatibility.level.as_str(),
            rewrite = compatibility.requires_rewrite,
            "Patterns retargeted for platform pair"
        );
    }

    Ok(aggregate(patterns))
}

fn resolve_patterns<I, S>(ids: I, catalog: &PatternCatalog) -> Result<Vec<PatternAssessment>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut patterns = Vec::new();

    for id in ids {
        let id = id.as_ref();
        let pattern = catalog
            .find(id)
            .ok_or_else(|| MigrationError::UnknownPattern { id: id.to_string() })?;
        if seen.insert(pattern.id.clone()) {
            patterns.push(PatternAssessment::from(pattern));
        }
    }

    if patterns.is_empty() {
        return Err(MigrationError::InvalidInput(
            "at least one contract pattern is required".to_string(),
        ));
    }
    Ok(patterns)
}

fn aggregate(mut patterns: Vec<PatternAssessment>) -> ContractAssessment {
    patterns.sort_by(|a, b| b.difficulty.cmp(&a.difficulty).then_with(|| a.id.cmp(&b.id)));

    let bottleneck = &patterns[0];
    let max = bottleneck.difficulty as f64;
    let mean = patterns.iter().map(|p| p.difficulty as f64).sum::<f64>() / patterns.len() as f64;
    let aggregate = DOMINANT_WEIGHT * max + MEAN_WEIGHT * mean;
    let level = ComplexityLevel::from_difficulty(aggregate);
    let effort = estimate_effort(&patterns);

    let complexity = SubScore::new(
        "complexity",
        aggregate * DIFFICULTY_SCALE,
        format!(
            "{} pattern(s), aggregate difficulty {:.1}/10 ({}); bottleneck {} at {}/10",
            patterns.len(),
            aggregate,
            level.as_str(),
            bottleneck.id,
            bottleneck.difficulty
        ),
    );

    debug!(
        patterns = patterns.len(),
        bottleneck = %bottleneck.id,
        score = complexity.value,
        min_weeks = effort.min_weeks,
        max_weeks = effort.max_weeks,
        "Contract complexity assessed"
    );

    ContractAssessment {
        bottleneck: bottleneck.id.clone(),
        patterns,
        complexity,
        effort,
        level,
    }
}
