//! Playbook synthesis.
//!
//! Turns a scored migration into a four-phase action plan. The phase list is
//! fixed; the scores decide what goes into each phase and how long it takes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bridge_risk::BridgeConnectivity;
use crate::complexity::{estimate_effort, PatternAssessment};
use crate::composite::CompositeResult;
use crate::platform::{platform_challenges, ChallengeSeverity};
use crate::types::EffortRange;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Strategy tag when no bridge route exists.
pub const NO_VIABLE_ROUTE: &str = "NO_VIABLE_ROUTE";

/// Complexity sub-score at or above which the bottleneck needs a rewrite plan.
pub const HIGH_COMPLEXITY_THRESHOLD: f64 = 70.0;

/// Phase names, in order.
pub const PHASE_NAMES: [&str; 4] = [
    "Assessment & Planning",
    "Development",
    "Token & Liquidity Migration",
    "Launch & Post-Migration",
];

/// One phase of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PlaybookPhase {
    /// 1-based position
    pub index: u8,
    /// Phase name
    pub name: String,
    /// Ordered checklist
    pub checklist: Vec<String>,
    /// Estimated duration
    pub duration: EffortRange,
}

impl PlaybookPhase {
    fn new(index: usize, duration: EffortRange) -> Self {
        Self {
            index: index as u8 + 1,
            name: PHASE_NAMES[index].to_string(),
            checklist: Vec::new(),
            duration,
        }
    }

    fn item(&mut self, text: impl Into<String>) {
        self.checklist.push(text.into());
    }
}

/// Complete migration plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Playbook {
    /// Source chain
    pub source: String,
    /// Target chain
    pub target: String,
    /// Exactly four phases
    pub phases: Vec<PlaybookPhase>,
    /// Recommended route id or `NO_VIABLE_ROUTE`
    pub recommended_bridge_strategy: String,
    /// Sum of phase durations
    pub total_duration: EffortRange,
}

impl Playbook {
    /// Whether the plan is blocked on a missing bridge route.
    pub fn is_blocked(&self) -> bool {
        self.recommended_bridge_strategy == NO_VIABLE_ROUTE
    }
}

/// Primary DEX on a chain, used for the generic liquidity plan.
fn primary_dex(chain: &str) -> Option<&'static str> {
    match chain {
        "solana" => Some("Jupiter"),
        "ethereum" => Some("Uniswap"),
        "bsc" => Some("PancakeSwap"),
        "polygon" => Some("QuickSwap"),
        "arbitrum" => Some("GMX"),
        "optimism" => Some("Velodrome"),
        "avalanche" => Some("Trader Joe"),
        "fantom" => Some("SpookySwap"),
        "base" => Some("Aerodrome"),
        "sui" => Some("Cetus"),
        _ => None,
    }
}

/// Liquidity bootstrap steps on the target chain.
pub fn liquidity_plan(target: &str) -> Vec<String> {
    match target {
        "solana" => vec![
            "Deploy SPL token (or Token-2022 for advanced features)".to_string(),
            "Seed liquidity on Jupiter aggregator via Meteora or Orca CLMM".to_string(),
            "Apply for Jupiter Verified Token List".to_string(),
            "Set up Raydium CPMM pool for stable liquidity".to_string(),
            "Consider Meteora DLMM for concentrated liquidity".to_string(),
            "Register on Solana token registry".to_string(),
        ],
        "ethereum" | "arbitrum" | "optimism" | "base" | "polygon" => vec![
            "Deploy ERC-20 token contract".to_string(),
            format!("Create Uniswap V3 pool on {}", target),
            "Seed initial liquidity ($10K+ recommended)".to_string(),
            "Register on token lists (Uniswap, CoinGecko)".to_string(),
            "Consider Curve pool if stablecoin-adjacent".to_string(),
        ],
        _ => vec![
            format!("Deploy token on {}", target),
            format!("Create pool on {}", primary_dex(target).unwrap_or("primary DEX")),
            "Seed initial liquidity".to_string(),
            "Register on chain's token list".to_string(),
        ],
    }
}

/// Build the migration playbook.
pub fn build_playbook(
    composite: &CompositeResult,
    connectivity: &BridgeConnectivity,
    patterns: &[PatternAssessment],
) -> Playbook {
    let source = connectivity.source.as_str();
    let target = connectivity.target.as_str();
    let route = connectivity.recommended();
    let bottleneck = patterns
        .iter()
        .min_by(|a, b| b.difficulty.cmp(&a.difficulty).then_with(|| a.id.cmp(&b.id)));
    let elevated = composite.risk_level.is_elevated();

    // Phase 1
    let mut assessment = PlaybookPhase::new(0, EffortRange::new(1, 2));
    match route {
        Some(route) => assessment.item(format!(
            "Confirm bridge route: {} ({}, base risk {})",
            route.name,
            route.mechanism.as_str(),
            route.base_risk
        )),
        None => assessment.item(format!(
            "BLOCKING: Resolve bridge route. No supported protocol connects {} and {}",
            source, target
        )),
    }
    if connectivity.canonical_available {
        assessment.item(format!("Verify canonical asset delivery on {}", target));
    }
    assessment.item(format!("Audit {} contract pattern(s) for porting", patterns.len()));
    assessment.item(format!(
        "Review feasibility ({:.0}, grade {}) and risk ({:.0}, {}) with stakeholders",
        composite.feasibility_score,
        composite.feasibility_grade.as_str(),
        composite.risk_score,
        composite.risk_level.as_str()
    ));
    if composite.incident_adjustment > 0.0 {
        assessment.item("Review exploit history of the chosen bridge and chains");
    }

    // Phase 2
    let mut development = PlaybookPhase::new(1, estimate_effort(patterns));
    for pattern in patterns {
        development.item(format!("Port {} to {}", pattern.id, pattern.equivalent));
    }
    if composite.sub_scores.complexity.value >= HIGH_COMPLEXITY_THRESHOLD {
        if let Some(bottleneck) = bottleneck {
            development.item(format!(
                "Plan a full rewrite of {} ({}/10): {}",
                bottleneck.id, bottleneck.difficulty, bottleneck.notes
            ));
            for difference in &bottleneck.key_differences {
                development.item(format!("{}: {}", bottleneck.id, difference));
            }
        }
    }
    for challenge in platform_challenges(source, target)
        .into_iter()
        .filter(|c| c.severity == ChallengeSeverity::High)
    {
        development.item(format!("{}: {}", challenge.issue, challenge.detail));
    }
    development.item(format!("Test all ported contracts on {} testnet", target));
    if elevated {
        development.item("Commission an independent security review of the ported contracts");
    }

    // Phase 3
    let token_duration = if route.is_some() {
        EffortRange::new(1, 3)
    } else {
        EffortRange::new(4, 8)
    };
    let mut token = PlaybookPhase::new(2, token_duration);
    match route {
        Some(route) => token.item(format!("Bridge token supply via {}", route.name)),
        None => {
            token.item("Design a custom token migration (snapshot and airdrop or bespoke bridge)")
        }
    }
    for step in liquidity_plan(target) {
        token.item(step);
    }

    // Phase 4
    let mut launch = PlaybookPhase::new(3, EffortRange::new(2, 4));
    if elevated {
        launch.item("Staged launch with deposit caps and a pause authority");
    }
    launch.item(format!("Deploy to {} mainnet", target));
    launch.item("Monitor TVL, bridge flows and user migration");
    launch.item(format!("Announce timeline and sunset the {} deployment", source));

    let phases = vec![assessment, development, token, launch];
    let total_duration = phases
        .iter()
        .fold(EffortRange::new(0, 0), |total, phase| total.plus(&phase.duration));
    let recommended_bridge_strategy = route
        .map(|r| r.protocol.clone())
        .unwrap_or_else(|| NO_VIABLE_ROUTE.to_string());

    debug!(
        source,
        target,
        strategy = %recommended_bridge_strategy,
        min_weeks = total_duration.min_weeks,
        max_weeks = total_duration.max_weeks,
        "Playbook built"
    );

    Playbook {
        source: source.to_string(),
        target: target.to_string(),
        phases,
        recommended_bridge_strategy,
        total_duration,
    }
}
