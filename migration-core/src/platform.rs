//! Chain execution-environment families and the challenges of crossing them.

use serde::{Deserialize, Serialize};

use crate::catalog::normalize_chain;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Execution environment of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ChainFamily {
    /// Ethereum Virtual Machine
    Evm,
    /// Solana Virtual Machine
    Svm,
    /// Move-based chains (Aptos, Sui)
    Move,
    Near,
    Cosmos,
    Unknown,
}

impl ChainFamily {
    /// Classify a chain by name.
    pub fn of(chain: &str) -> Self {
        match normalize_chain(chain).as_str() {
            "ethereum" | "bsc" | "polygon" | "arbitrum" | "optimism" | "base" | "avalanche"
            | "fantom" => Self::Evm,
            "solana" | "eclipse" => Self::Svm,
            "aptos" | "sui" => Self::Move,
            "near" => Self::Near,
            "cosmos" | "osmosis" | "injective" => Self::Cosmos,
            _ => Self::Unknown,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::Svm => "svm",
            Self::Move => "move",
            Self::Near => "near",
            Self::Cosmos => "cosmos",
            Self::Unknown => "unknown",
        }
    }
}

/// Compatibility difficulty (0-100) at or above which contracts need a rewrite.
pub const REWRITE_THRESHOLD: u8 = 60;

/// Compatibility difficulty for pairs with no table entry or family default.
pub const UNKNOWN_PAIR_DIFFICULTY: u8 = 50;

/// Known chain pairs and their porting difficulty. Looked up in both directions.
const PAIR_DIFFICULTY: &[(&str, &str, u8)] = &[
    ("ethereum", "arbitrum", 10),
    ("ethereum", "optimism", 10),
    ("ethereum", "base", 10),
    ("ethereum", "polygon", 15),
    ("ethereum", "bsc", 15),
    ("ethereum", "avalanche", 15),
    ("ethereum", "solana", 80),
    ("ethereum", "sui", 85),
    ("ethereum", "aptos", 85),
    ("ethereum", "near", 70),
    ("ethereum", "cosmos", 60),
    ("solana", "ethereum", 75),
];

fn family_difficulty(source: ChainFamily, target: ChainFamily) -> Option<u8> {
    use ChainFamily::*;
    match (source, target) {
        (Unknown, _) | (_, Unknown) => None,
        (a, b) if a == b => Some(15),
        (Evm, Svm) => Some(80),
        (Evm, Move) => Some(85),
        (Evm, Near) => Some(70),
        (Evm, Cosmos) => Some(60),
        (Svm, Evm) => Some(75),
        _ => None,
    }
}

/// Coarse bucket for a compatibility difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityLevel {
    Trivial,
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

impl CompatibilityLevel {
    /// Bucket a 0-100 difficulty.
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=19 => Self::Trivial,
            20..=39 => Self::Easy,
            40..=59 => Self::Moderate,
            60..=79 => Self::Hard,
            _ => Self::VeryHard,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trivial => "TRIVIAL",
            Self::Easy => "EASY",
            Self::Moderate => "MODERATE",
            Self::Hard => "HARD",
            Self::VeryHard => "VERY_HARD",
        }
    }
}

/// How far apart two chains' execution environments are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PlatformCompatibility {
    /// Family of the source chain
    pub source_family: ChainFamily,
    /// Family of the target chain
    pub target_family: ChainFamily,
    /// Porting difficulty, 0-100 (higher = harder)
    pub difficulty: u8,
    /// Difficulty bucket
    pub level: CompatibilityLevel,
    /// Whether contracts must be rewritten rather than redeployed
    pub requires_rewrite: bool,
}

/// Compatibility of the `source` → `target` pair.
///
/// Explicit pairs win, then family defaults, then `UNKNOWN_PAIR_DIFFICULTY`.
pub fn platform_compatibility(source: &str, target: &str) -> PlatformCompatibility {
    let source_key = normalize_chain(source);
    let target_key = normalize_chain(target);
    let source_family = ChainFamily::of(&source_key);
    let target_family = ChainFamily::of(&target_key);

    let lookup = |a: &str, b: &str| {
        PAIR_DIFFICULTY
            .iter()
            .find(|(s, t, _)| *s == a && *t == b)
            .map(|(_, _, d)| *d)
    };
    let difficulty = lookup(&source_key, &target_key)
        .or_else(|| lookup(&target_key, &source_key))
        .or_else(|| family_difficulty(source_family, target_family))
        .unwrap_or(UNKNOWN_PAIR_DIFFICULTY);

    PlatformCompatibility {
        source_family,
        target_family,
        difficulty,
        level: CompatibilityLevel::from_difficulty(difficulty),
        requires_rewrite: difficulty >= REWRITE_THRESHOLD,
    }
}

/// How much a platform difference affects a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeSeverity {
    Low,
    Medium,
    High,
}

/// A difference between source and target platforms that the port must absorb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PlatformChallenge {
    /// Short name of the issue
    pub issue: String,
    /// Impact on the port
    pub severity: ChallengeSeverity,
    /// What changes
    pub detail: String,
}

fn challenge(issue: &str, severity: ChallengeSeverity, detail: &str) -> PlatformChallenge {
    PlatformChallenge {
        issue: issue.to_string(),
        severity,
        detail: detail.to_string(),
    }
}

fn evm_to_svm() -> Vec<PlatformChallenge> {
    use ChallengeSeverity::*;
    vec![
        challenge(
            "Account Model",
            High,
            "EVM uses contract storage; Solana uses separate accounts. \
             All state must be restructured into PDAs.",
        ),
        challenge(
            "Language Rewrite",
            High,
            "Solidity to Rust/Anchor. No automated transpilation.",
        ),
        challenge(
            "Token Standard",
            Medium,
            "ERC-20 to SPL Token. Different approval model (delegate vs approve).",
        ),
        challenge(
            "Gas Model",
            Medium,
            "EVM gas becomes Solana compute units and rent. \
             Storage costs are upfront (rent-exempt).",
        ),
        challenge(
            "Reentrancy",
            Low,
            "Solana's runtime prevents classic reentrancy. Some guard logic becomes unnecessary.",
        ),
        challenge(
            "Cross-Contract Calls",
            Medium,
            "EVM external calls become CPI (Cross-Program Invocation) \
             with explicit account passing.",
        ),
        challenge(
            "Events/Logs",
            Low,
            "EVM events become Anchor events or program logs. Indexing approach differs.",
        ),
        challenge(
            "Upgradeability",
            Medium,
            "Proxy patterns are replaced by native program upgrades via upgrade authority.",
        ),
    ]
}

/// Platform challenges for moving from `source` to `target`.
///
/// Only EVM → SVM and EVM → EVM are characterized; other pairs return nothing.
pub fn platform_challenges(source: &str, target: &str) -> Vec<PlatformChallenge> {
    match (ChainFamily::of(source), ChainFamily::of(target)) {
        (ChainFamily::Evm, ChainFamily::Svm) => evm_to_svm(),
        (ChainFamily::Evm, ChainFamily::Evm) => vec![challenge(
            "Minimal Changes",
            ChallengeSeverity::Low,
            "EVM-to-EVM migration. Mostly redeployment with chain-specific config changes.",
        )],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_classification() {
        assert_eq!(ChainFamily::of("Ethereum"), ChainFamily::Evm);
        assert_eq!(ChainFamily::of(" solana "), ChainFamily::Svm);
        assert_eq!(ChainFamily::of("Sui"), ChainFamily::Move);
        assert_eq!(ChainFamily::of("tron"), ChainFamily::Unknown);
    }

    #[test]
    fn test_evm_to_solana_challenges() {
        let challenges = platform_challenges("Polygon", "Solana");
        assert_eq!(challenges.len(), 8);
        let high: Vec<&str> = challenges
            .iter()
            .filter(|c| c.severity == ChallengeSeverity::High)
            .map(|c| c.issue.as_str())
            .collect();
        assert_eq!(high, vec!["Account Model", "Language Rewrite"]);
    }

    #[test]
    fn test_compatibility_table() {
        let l2 = platform_compatibility("Ethereum", "Base");
        assert_eq!(l2.difficulty, 10);
        assert_eq!(l2.level, CompatibilityLevel::Trivial);
        assert!(!l2.requires_rewrite);

        let svm = platform_compatibility("fantom", "solana");
        assert_eq!(svm.difficulty, 80);
        assert_eq!(svm.level, CompatibilityLevel::VeryHard);
        assert!(svm.requires_rewrite);

        // reverse lookup and family fallback
        assert_eq!(platform_compatibility("arbitrum", "ethereum").difficulty, 10);
        assert_eq!(platform_compatibility("base", "optimism").difficulty, 15);
        assert_eq!(platform_compatibility("polygon", "sui").difficulty, 85);
        assert_eq!(platform_compatibility("tron", "solana").difficulty, UNKNOWN_PAIR_DIFFICULTY);
    }

    #[test]
    fn test_other_pairs() {
        let evm = platform_challenges("ethereum", "base");
        assert_eq!(evm.len(), 1);
        assert_eq!(evm[0].severity, ChallengeSeverity::Low);

        assert!(platform_challenges("solana", "ethereum").is_empty());
        assert!(platform_challenges("aptos", "near").is_empty());
    }
}
