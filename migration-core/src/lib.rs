//! Chain Migration Feasibility Engine
//!
//! Scores whether moving a blockchain project from one chain to another is
//! advisable, and turns the answer into a phased plan:
//!
//! - **Chain health**: log-scaled TVL and protocol counts, trend signals
//! - **Bridge risk**: route discovery over a static protocol catalog
//! - **Contract complexity**: pattern difficulty and porting effort
//! - **Composite scoring**: feasibility grade and risk level under a policy
//! - **Playbook**: four-phase action plan with durations
//!
//! Everything here is synchronous and side-effect free apart from logging.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  ┌───────────────┐  ┌───────────────┐
//! │ Chain health  │  │  Bridge risk  │  │  Complexity   │
//! └───────┬───────┘  └───────┬───────┘  └───────┬───────┘
//!         │                  │                  │
//!         └──────────┬───────┴──────────────────┘
//!                    │
//!            ┌───────▼───────┐
//!            │   Composite   │◄── ScoringPolicy
//!            └───────┬───────┘
//!                    │
//!            ┌───────▼───────┐
//!            │   Playbook    │
//!            └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use migration_core::{
//!     evaluate_migration, BridgeCatalog, ChainHealthRecord, MigrationInput, ScoringPolicy,
//! };
//!
//! let input = MigrationInput {
//!     source: ChainHealthRecord::new("Fantom", 4.0e8, -22.0, 60)?,
//!     target: ChainHealthRecord::new("Solana", 9.0e9, 14.0, 350)?,
//!     patterns: vec!["ERC-20".to_string(), "Staking".to_string()],
//!     incident_adjustment: None,
//! };
//! let verdict = evaluate_migration(&input, BridgeCatalog::builtin(), &ScoringPolicy::default())?;
//! println!("{}", verdict.composite.feasibility_grade.as_str());
//! ```

pub mod bridge_risk;
pub mod catalog;
pub mod chain_health;
pub mod complexity;
pub mod composite;
pub mod pipeline;
pub mod platform;
pub mod playbook;
pub mod policy;
pub mod types;

// Re-export main types
pub use bridge_risk::{
    evaluate_bridge_risk, token_migration_complexity, BridgeConnectivity, BridgeRoute,
    TokenMigrationComplexity,
};
pub use catalog::*;
pub use chain_health::{evaluate_chain_health, ChainHealthAssessment, MigrationCase};
pub use complexity::{
    assess_contracts, assess_contracts_for, ComplexityLevel, ContractAssessment,
    PatternAssessment,
};
pub use composite::{score, CompositeResult, Grade, RiskLevel, Scorer, SubScores};
pub use pipeline::{evaluate_migration, MigrationInput, MigrationVerdict};
pub use platform::{
    platform_challenges, platform_compatibility, ChainFamily, ChallengeSeverity,
    CompatibilityLevel, PlatformChallenge, PlatformCompatibility,
};
pub use playbook::{build_playbook, Playbook, PlaybookPhase, NO_VIABLE_ROUTE};
pub use policy::ScoringPolicy;
pub use types::*;
