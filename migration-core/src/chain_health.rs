//! Chain metric normalization.
//!
//! Turns raw chain health records into bounded health scores and a
//! comparative score for a source → target migration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{clamp_score, ChainHealthRecord, ChainTrend, Result, SubScore};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// TVL (USD) at or below which the TVL component is 0.
pub const TVL_FLOOR_USD: f64 = 1e6;

/// TVL (USD) at or above which the TVL component saturates at 100.
pub const TVL_CEILING_USD: f64 = 1e11;

/// Protocol count at which the protocol component saturates.
pub const PROTOCOL_SATURATION: u32 = 500;

/// Share of the TVL component in the base health score.
pub const TVL_WEIGHT: f64 = 0.75;

/// Share of the protocol component in the base health score.
pub const PROTOCOL_WEIGHT: f64 = 0.25;

/// Added to the health of a growing chain.
pub const GROWING_TREND_BONUS: f64 = 10.0;

/// Subtracted from the health of a declining chain.
pub const DECLINING_TREND_PENALTY: f64 = 15.0;

/// Comparative score when both chains are equally healthy and no signal fires.
pub const NEUTRAL_COMPARATIVE: f64 = 50.0;

/// Weight of (target health - source health) in the comparative score.
pub const HEALTH_DELTA_WEIGHT: f64 = 0.5;

/// Added when the source chain is declining.
pub const SOURCE_DECLINING_BONUS: f64 = 10.0;

/// Added when the target chain is growing.
pub const TARGET_GROWING_BONUS: f64 = 10.0;

/// Target/source TVL ratio that triggers `TVL_RATIO_BONUS`.
pub const TVL_RATIO_THRESHOLD: f64 = 2.0;

/// Added when the target holds substantially more value.
pub const TVL_RATIO_BONUS: f64 = 5.0;

/// Target/source protocol ratio that triggers `PROTOCOL_RATIO_BONUS`.
pub const PROTOCOL_RATIO_THRESHOLD: f64 = 1.5;

/// Added when the target hosts substantially more protocols.
pub const PROTOCOL_RATIO_BONUS: f64 = 5.0;

/// Signal points for a declining source chain.
pub const SOURCE_DECLINING_SIGNAL: u8 = 25;

/// Signal points for a growing target chain.
pub const TARGET_GROWING_SIGNAL: u8 = 25;

/// Signal points for the TVL ratio trigger.
pub const TVL_RATIO_SIGNAL: u8 = 15;

/// Signal points for the protocol ratio trigger.
pub const PROTOCOL_RATIO_SIGNAL: u8 = 15;

/// Signal strength at or above which the case is strong.
pub const STRONG_CASE_THRESHOLD: u8 = 50;

/// Signal strength at or above which the case is moderate.
pub const MODERATE_CASE_THRESHOLD: u8 = 25;

/// How strongly the market signals argue for moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationCase {
    /// Consider staying
    Weak,
    Moderate,
    Strong,
}

impl MigrationCase {
    /// Bucket a 0-100 signal strength.
    pub fn from_signal(strength: u8) -> Self {
        if strength >= STRONG_CASE_THRESHOLD {
            Self::Strong
        } else if strength >= MODERATE_CASE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "WEAK",
            Self::Moderate => "MODERATE",
            Self::Strong => "STRONG",
        }
    }
}

/// Health scores for both chains and the comparative migration score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChainHealthAssessment {
    /// Health of the source chain
    pub source: SubScore,
    /// Health of the target chain
    pub target: SubScore,
    /// How favorable the move is, 50 = neutral
    pub comparative: SubScore,
    /// Migration signals that fired
    pub signals: Vec<String>,
    /// Sum of fired signal points, capped at 100
    pub signal_strength: u8,
    /// Migration case implied by the signals
    pub case: MigrationCase,
}

/// Log-scaled TVL component in [0, 100].
///
/// Zero TVL maps straight to 0 without touching the logarithm.
pub fn tvl_component(tvl_usd: f64) -> f64 {
    if tvl_usd <= 0.0 {
        return 0.0;
    }
    let span = TVL_CEILING_USD.log10() - TVL_FLOOR_USD.log10();
    let position = (tvl_usd.log10() - TVL_FLOOR_USD.log10()) / span;
    position.clamp(0.0, 1.0) * 100.0
}

/// Log-scaled protocol-count component in [0, 100].
pub fn protocol_component(protocol_count: u32) -> f64 {
    let scaled = (1.0 + protocol_count as f64).ln() / (1.0 + PROTOCOL_SATURATION as f64).ln();
    scaled.clamp(0.0, 1.0) * 100.0
}

fn trend_adjustment(trend: ChainTrend) -> f64 {
    match trend {
        ChainTrend::Growing => GROWING_TREND_BONUS,
        ChainTrend::Stable => 0.0,
        ChainTrend::Declining => -DECLINING_TREND_PENALTY,
    }
}

/// Health score for a single chain.
pub fn chain_health_score(record: &ChainHealthRecord) -> Result<SubScore> {
    record.validate()?;
    let name = format!("chain_health:{}", record.name);

    if record.tvl_usd == 0.0 {
        return Ok(SubScore::new(
            name,
            0.0,
            format!("{} has no value locked", record.name),
        ));
    }

    let tvl = tvl_component(record.tvl_usd);
    let protocols = protocol_component(record.protocol_count);
    let base = clamp_score(TVL_WEIGHT * tvl + PROTOCOL_WEIGHT * protocols);
    let value = clamp_score(base + trend_adjustment(record.trend));

    Ok(SubScore::new(
        name,
        value,
        format!(
            "{}: TVL component {:.1}, protocol component {:.1}, trend {} ({:+.1}% 30d)",
            record.name,
            tvl,
            protocols,
            record.trend.as_str(),
            record.change_30d_pct
        ),
    ))
}

/// Evaluate both chains and score the migration between them.
pub fn evaluate_chain_health(
    source: &ChainHealthRecord,
    target: &ChainHealthRecord,
) -> Result<ChainHealthAssessment> {
    let source_score = chain_health_score(source)?;
    let target_score = chain_health_score(target)?;

    let delta = target_score.value - source_score.value;
    let mut value = NEUTRAL_COMPARATIVE + HEALTH_DELTA_WEIGHT * delta;
    let mut signals = Vec::new();
    let mut strength: u8 = 0;

    if source.trend == ChainTrend::Declining {
        value += SOURCE_DECLINING_BONUS;
        strength += SOURCE_DECLINING_SIGNAL;
        signals.push(format!(
            "Source chain declining ({:.1}% 30d)",
            source.change_30d_pct
        ));
    }
    if target.trend == ChainTrend::Growing {
        value += TARGET_GROWING_BONUS;
        strength += TARGET_GROWING_SIGNAL;
        signals.push(format!(
            "Target chain growing ({:.1}% 30d)",
            target.change_30d_pct
        ));
    }

    let tvl_ratio = target.tvl_usd / source.tvl_usd.max(1.0);
    if tvl_ratio >= TVL_RATIO_THRESHOLD {
        value += TVL_RATIO_BONUS;
        strength += TVL_RATIO_SIGNAL;
        signals.push(format!("Target has {:.1}x more TVL", tvl_ratio));
    }

    let protocol_ratio = target.protocol_count as f64 / source.protocol_count.max(1) as f64;
    if protocol_ratio >= PROTOCOL_RATIO_THRESHOLD {
        value += PROTOCOL_RATIO_BONUS;
        strength += PROTOCOL_RATIO_SIGNAL;
        signals.push(format!("Target has {:.1}x more protocols", protocol_ratio));
    }

    if source.trend != ChainTrend::Declining && target.trend != ChainTrend::Growing {
        signals.push("Both chains appear stable; migration may not be urgent".to_string());
    }

    let value = clamp_score(value);
    let signal_strength = strength.min(100);
    let case = MigrationCase::from_signal(signal_strength);
    let direction = if delta < 0.0 {
        "away from a healthier chain"
    } else {
        "toward an equally or more healthy chain"
    };
    let rationale = format!(
        "Moving {} (health {:.1} -> {:.1}); {} migration case; {}",
        direction,
        source_score.value,
        target_score.value,
        case.as_str(),
        signals.join("; ")
    );

    debug!(
        source = %source.name,
        target = %target.name,
        source_health = source_score.value,
        target_health = target_score.value,
        comparative = value,
        case = case.as_str(),
        "Chain health evaluated"
    );

    Ok(ChainHealthAssessment {
        source: source_score,
        target: target_score,
        comparative: SubScore::new("chain_health", value, rationale),
        signals,
        signal_strength,
        case,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, tvl: f64, change: f64, protocols: u32) -> ChainHealthRecord {
        ChainHealthRecord::new(name, tvl, change, protocols).unwrap()
    }

    #[test]
    fn test_zero_tvl_is_minimum() {
        let score = chain_health_score(&record("Ghost", 0.0, 50.0, 300)).unwrap();
        assert_eq!(score.value, 0.0);
        assert_eq!(tvl_component(0.0), 0.0);
    }

    #[test]
    fn test_tvl_component_bounds() {
        assert_eq!(tvl_component(TVL_FLOOR_USD), 0.0);
        assert_eq!(tvl_component(TVL_CEILING_USD), 100.0);
        assert_eq!(tvl_component(1e13), 100.0);
        let mid = tvl_component(10f64.powf(8.5));
        assert!((mid - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_moves_health() {
        let growing = chain_health_score(&record("A", 1e9, 15.0, 100)).unwrap();
        let stable = chain_health_score(&record("A", 1e9, 0.0, 100)).unwrap();
        let declining = chain_health_score(&record("A", 1e9, -15.0, 100)).unwrap();
        assert!(growing.value > stable.value);
        assert!(stable.value > declining.value);
    }

    #[test]
    fn test_migration_toward_healthier_growing_chain() {
        let fantom = record("Fantom", 5e7, -20.0, 40);
        let solana = record("Solana", 8e9, 12.0, 300);
        let assessment = evaluate_chain_health(&fantom, &solana).unwrap();

        assert!(assessment.comparative.value > NEUTRAL_COMPARATIVE);
        assert_eq!(assessment.signals.len(), 4);
        assert_eq!(assessment.signal_strength, 80);
        assert_eq!(assessment.case, MigrationCase::Strong);
        assert!(assessment.comparative.rationale.contains("toward"));
    }

    #[test]
    fn test_migration_away_from_healthier_chain_penalized() {
        let ethereum = record("Ethereum", 6e10, 2.0, 900);
        let fantom = record("Fantom", 5e7, -20.0, 40);
        let assessment = evaluate_chain_health(&ethereum, &fantom).unwrap();

        assert!(assessment.comparative.value < NEUTRAL_COMPARATIVE);
        assert!(assessment.comparative.rationale.contains("away from"));
    }

    #[test]
    fn test_migration_case_buckets() {
        // only the tvl ratio fires
        let source = record("Base", 1e9, 0.0, 200);
        let target = record("Arbitrum", 3e9, 0.0, 220);
        let assessment = evaluate_chain_health(&source, &target).unwrap();
        assert_eq!(assessment.signal_strength, TVL_RATIO_SIGNAL);
        assert_eq!(assessment.case, MigrationCase::Weak);

        // declining source alone is a moderate case
        let declining = record("Fantom", 1e9, -20.0, 200);
        let flat = record("Sonic", 1e9, 0.0, 200);
        let assessment = evaluate_chain_health(&declining, &flat).unwrap();
        assert_eq!(assessment.case, MigrationCase::Moderate);

        assert_eq!(MigrationCase::from_signal(50), MigrationCase::Strong);
        assert_eq!(MigrationCase::from_signal(49), MigrationCase::Moderate);
        assert_eq!(MigrationCase::from_signal(24), MigrationCase::Weak);
    }

    #[test]
    fn test_comparative_monotone_in_target_tvl() {
        let source = record("Fantom", 3e8, -5.0, 80);
        let mut previous = f64::MIN;
        for exponent in 0..=26 {
            let tvl = if exponent == 0 { 0.0 } else { 10f64.powf(exponent as f64 * 0.5) };
            let target = record("Target", tvl, 3.0, 120);
            let value = evaluate_chain_health(&source, &target).unwrap().comparative.value;
            assert!(value >= previous, "score dropped at tvl {}", tvl);
            previous = value;
        }
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut bad = record("Bad", 1e9, 0.0, 1);
        bad.tvl_usd = -5.0;
        let good = record("Good", 1e9, 0.0, 1);
        assert!(evaluate_chain_health(&bad, &good).is_err());
        assert!(evaluate_chain_health(&good, &bad).is_err());
    }
}
