//! End-to-end evaluation of a migration.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bridge_risk::{
    evaluate_bridge_risk, token_migration_complexity, BridgeConnectivity,
    TokenMigrationComplexity,
};
use crate::catalog::{BridgeCatalog, PatternCatalog};
use crate::chain_health::{evaluate_chain_health, ChainHealthAssessment};
use crate::complexity::{assess_contracts_for, ContractAssessment};
use crate::composite::{CompositeResult, Scorer, SubScores};
use crate::platform::{
    platform_challenges, platform_compatibility, PlatformChallenge, PlatformCompatibility,
};
use crate::playbook::{build_playbook, Playbook};
use crate::policy::ScoringPolicy;
use crate::types::{ChainHealthRecord, Result, SubScore};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Everything needed to evaluate one migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MigrationInput {
    /// Chain the project lives on today
    pub source: ChainHealthRecord,
    /// Chain the project would move to
    pub target: ChainHealthRecord,
    /// Contract pattern identifiers
    pub patterns: Vec<String>,
    /// Externally derived incident adjustment
    #[serde(default)]
    pub incident_adjustment: Option<f64>,
}

/// Full evaluation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MigrationVerdict {
    /// Per-chain health and the comparative score
    pub chain_health: ChainHealthAssessment,
    /// Routes between the chains
    pub connectivity: BridgeConnectivity,
    /// Bridge risk sub-score
    pub bridge_risk: SubScore,
    /// How hard moving the token supply is
    pub token_migration: TokenMigrationComplexity,
    /// Contract porting assessment for this chain pair
    pub contracts: ContractAssessment,
    /// Execution-environment distance between the chains
    pub compatibility: PlatformCompatibility,
    /// Platform differences the port must absorb
    pub platform_challenges: Vec<PlatformChallenge>,
    /// Grade, risk level and the sub-scores behind them
    pub composite: CompositeResult,
    /// Four-phase action plan
    pub playbook: Playbook,
}

/// Evaluate a migration.
///
/// The three component evaluations are independent; any failure aborts the
/// whole evaluation without a partial verdict.
pub fn evaluate_migration(
    input: &MigrationInput,
    catalog: &BridgeCatalog,
    policy: &ScoringPolicy,
) -> Result<MigrationVerdict> {
    let scorer = Scorer::new(policy.clone())?;

    let chain_health = evaluate_chain_health(&input.source, &input.target)?;
    let (connectivity, bridge_risk) =
        evaluate_bridge_risk(&input.source.name, &input.target.name, catalog)?;
    let contracts = assess_contracts_for(
        &input.patterns,
        &input.source.name,
        &input.target.name,
        PatternCatalog::builtin(),
    )?;

    let composite = scorer.score(
        &SubScores {
            chain_health: chain_health.comparative.clone(),
            bridge_risk: bridge_risk.clone(),
            complexity: contracts.complexity.clone(),
        },
        input.incident_adjustment,
    )?;
    let playbook = build_playbook(&composite, &connectivity, &contracts.patterns);
    let token_migration = token_migration_complexity(&connectivity);
    let compatibility = platform_compatibility(&connectivity.source, &connectivity.target);
    let platform_challenges = platform_challenges(&connectivity.source, &connectivity.target);

    info!(
        source = %connectivity.source,
        target = %connectivity.target,
        feasibility = composite.feasibility_score,
        grade = composite.feasibility_grade.as_str(),
        risk = composite.risk_score,
        level = composite.risk_level.as_str(),
        case = chain_health.case.as_str(),
        token_migration = token_migration.as_str(),
        strategy = %playbook.recommended_bridge_strategy,
        "Migration evaluated"
    );

    Ok(MigrationVerdict {
        chain_health,
        connectivity,
        bridge_risk,
        token_migration,
        contracts,
        compatibility,
        platform_challenges,
        composite,
        playbook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_health::MigrationCase;
    use crate::composite::{Grade, RiskLevel};
    use crate::complexity::ComplexityLevel;
    use crate::playbook::NO_VIABLE_ROUTE;
    use crate::types::MigrationError;

    fn input(source: &str, target: &str, patterns: &[&str]) -> MigrationInput {
        MigrationInput {
            source: ChainHealthRecord::new(source, 4.0e8, -22.0, 60).unwrap(),
            target: ChainHealthRecord::new(target, 9.0e9, 14.0, 350).unwrap(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            incident_adjustment: None,
        }
    }

    #[test]
    fn test_fantom_to_solana() {
        let verdict = evaluate_migration(
            &input("Fantom", "Solana", &["ERC-20", "Staking"]),
            BridgeCatalog::builtin(),
            &ScoringPolicy::default(),
        )
        .unwrap();

        // layerzero is cheapest; wormhole supplies the canonical route: 20 - 10
        assert_eq!(verdict.playbook.recommended_bridge_strategy, "layerzero");
        assert!(verdict.connectivity.canonical_available);
        assert_eq!(verdict.bridge_risk.value, 10.0);
        assert_eq!(verdict.platform_challenges.len(), 8);
        assert!(verdict.compatibility.requires_rewrite);
        assert_eq!(verdict.token_migration, TokenMigrationComplexity::Medium);
        assert_eq!(verdict.chain_health.case, MigrationCase::Strong);
        assert!(verdict.composite.feasibility_grade <= Grade::B);
        assert_eq!(verdict.composite.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_no_route_is_not_an_error() {
        let verdict = evaluate_migration(
            &input("Ethereum", "Aptos", &["AMM/DEX"]),
            BridgeCatalog::builtin(),
            &ScoringPolicy::default(),
        )
        .unwrap();
        assert!(verdict.connectivity.is_empty());
        assert_eq!(verdict.playbook.recommended_bridge_strategy, NO_VIABLE_ROUTE);
        assert_eq!(verdict.token_migration, TokenMigrationComplexity::VeryHigh);
    }

    #[test]
    fn test_evm_to_evm_is_scored_as_redeployment() {
        let verdict = evaluate_migration(
            &input("Ethereum", "Base", &["AMM/DEX", "ERC-20"]),
            BridgeCatalog::builtin(),
            &ScoringPolicy::default(),
        )
        .unwrap();

        assert!(!verdict.compatibility.requires_rewrite);
        assert_eq!(verdict.contracts.level, ComplexityLevel::Simple);
        assert!(verdict.composite.sub_scores.complexity.value < 20.0);
        assert_eq!(verdict.token_migration, TokenMigrationComplexity::Low);

        let development = &verdict.playbook.phases[1].checklist;
        assert!(development.iter().all(|i| !i.contains("SPL") && !i.contains("PDA")));
        assert!(!development.iter().any(|i| i.starts_with("Plan a full rewrite")));
        assert!(development.contains(&"Port AMM/DEX to AMM/DEX on base".to_string()));
    }

    #[test]
    fn test_failures_abort() {
        let bad = input("Ethereum", "Solana", &["UNKNOWN_X"]);
        assert!(matches!(
            evaluate_migration(&bad, BridgeCatalog::builtin(), &ScoringPolicy::default()),
            Err(MigrationError::UnknownPattern { .. })
        ));

        let same = input("Solana", "solana", &["ERC-20"]);
        assert!(matches!(
            evaluate_migration(&same, BridgeCatalog::builtin(), &ScoringPolicy::default()),
            Err(MigrationError::InvalidInput(_))
        ));

        let mut policy = ScoringPolicy::default();
        policy.feasibility.chain_health = 0.0;
        let valid = input("Ethereum", "Solana", &["ERC-20"]);
        assert!(matches!(
            evaluate_migration(&valid, BridgeCatalog::builtin(), &policy),
            Err(MigrationError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let input = input("Polygon", "Solana", &["AMM/DEX", "Governance/DAO", "ERC-20"]);
        let policy = ScoringPolicy::default();
        let first = evaluate_migration(&input, BridgeCatalog::builtin(), &policy).unwrap();
        let second = evaluate_migration(&input, BridgeCatalog::builtin(), &policy).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_input_roundtrips_through_json() {
        let input = input("Fantom", "Solana", &["ERC-20"]);
        let json = serde_json::to_string(&input).unwrap();
        let parsed: MigrationInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, input);
    }
}
