//! Bridge connectivity and risk.
//!
//! A missing route is a normal outcome, scored at the worst possible risk,
//! never an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{normalize_chain, BridgeCatalog, BridgeProtocol, TransferMechanism};
use crate::platform::ChainFamily;
use crate::types::{MigrationError, Result, SubScore};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Risk assigned when no protocol connects the pair.
pub const NO_ROUTE_RISK: f64 = 100.0;

/// Risk reduction when a canonical route into the target exists.
pub const CANONICAL_ROUTE_BONUS: f64 = 10.0;

/// Highest risk a routed pair can reach. Kept below `NO_ROUTE_RISK`.
pub const ROUTED_RISK_CEILING: f64 = 90.0;

/// One protocol able to carry assets between the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BridgeRoute {
    /// Protocol id
    pub protocol: String,
    /// Display name
    pub name: String,
    /// Transfer mechanism
    pub mechanism: TransferMechanism,
    /// Base risk rating of the protocol
    pub base_risk: u8,
    /// Whether the route delivers a canonical asset on the target
    pub canonical: bool,
    /// Breadth of the protocol's chain support
    pub supported_chain_count: usize,
    /// Whether the protocol offers native token transfers
    pub native_token_transfers: bool,
}

impl BridgeRoute {
    fn from_protocol(protocol: &BridgeProtocol, target: &str) -> Self {
        Self {
            protocol: protocol.id.clone(),
            name: protocol.name.clone(),
            mechanism: protocol.mechanism,
            base_risk: protocol.base_risk,
            canonical: protocol.is_canonical_for(target),
            supported_chain_count: protocol.supported_chains.len(),
            native_token_transfers: protocol.native_token_transfers,
        }
    }
}

/// All routes between a source and target chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BridgeConnectivity {
    /// Case-folded source chain
    pub source: String,
    /// Case-folded target chain
    pub target: String,
    /// Supporting routes, preferred first
    pub routes: Vec<BridgeRoute>,
    /// Whether any route is canonical
    pub canonical_available: bool,
    /// Lowest base risk among routes, `None` when there are none
    pub min_base_risk: Option<u8>,
}

impl BridgeConnectivity {
    /// Whether no protocol connects the pair.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The preferred route.
    pub fn recommended(&self) -> Option<&BridgeRoute> {
        self.routes.first()
    }
}

/// Difficulty of moving the project's token supply across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenMigrationComplexity {
    /// EVM to EVM over a standard bridge
    Low,
    /// Established native transfer path (NTT or burn-and-mint)
    Medium,
    /// Cross-VM move needing custom bridge integration
    High,
    /// No standard bridge at all
    VeryHigh,
}

impl TokenMigrationComplexity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        }
    }
}

/// Rate how hard moving the token supply over the available routes is.
pub fn token_migration_complexity(connectivity: &BridgeConnectivity) -> TokenMigrationComplexity {
    if connectivity.is_empty() {
        return TokenMigrationComplexity::VeryHigh;
    }

    let source = ChainFamily::of(&connectivity.source);
    let target = ChainFamily::of(&connectivity.target);
    if source == ChainFamily::Evm && target == ChainFamily::Evm {
        return TokenMigrationComplexity::Low;
    }

    let native_path = connectivity
        .routes
        .iter()
        .any(|r| r.native_token_transfers || r.mechanism == TransferMechanism::BurnAndMint);
    if native_path {
        TokenMigrationComplexity::Medium
    } else {
        TokenMigrationComplexity::High
    }
}

fn route_order(a: &BridgeRoute, b: &BridgeRoute) -> std::cmp::Ordering {
    a.base_risk
        .cmp(&b.base_risk)
        .then_with(|| b.canonical.cmp(&a.canonical))
        .then_with(|| b.supported_chain_count.cmp(&a.supported_chain_count))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.protocol.cmp(&b.protocol))
}

/// Find every route between two chains.
pub fn find_routes(
    source: &str,
    target: &str,
    catalog: &BridgeCatalog,
) -> Result<BridgeConnectivity> {
    let source = normalize_chain(source);
    let target = normalize_chain(target);

    if source.is_empty() || target.is_empty() {
        return Err(MigrationError::InvalidInput(
            "source and target chains must be named".to_string(),
        ));
    }
    if source == target {
        return Err(MigrationError::InvalidInput(format!(
            "source and target are the same chain: {}",
            source
        )));
    }

    let mut routes: Vec<BridgeRoute> = catalog
        .protocols()
        .iter()
        .filter(|p| p.connects(&source, &target))
        .map(|p| BridgeRoute::from_protocol(p, &target))
        .collect();
    routes.sort_by(route_order);

    let canonical_available = routes.iter().any(|r| r.canonical);
    let min_base_risk = routes.iter().map(|r| r.base_risk).min();

    Ok(BridgeConnectivity {
        source,
        target,
        routes,
        canonical_available,
        min_base_risk,
    })
}

/// Score the risk of a set of routes.
pub fn bridge_risk_score(connectivity: &BridgeConnectivity) -> SubScore {
    let Some(best) = connectivity.recommended() else {
        return SubScore::new(
            "bridge_risk",
            NO_ROUTE_RISK,
            format!(
                "No bridge protocol connects {} and {}",
                connectivity.source, connectivity.target
            ),
        );
    };

    let min_risk = connectivity.min_base_risk.unwrap_or(best.base_risk) as f64;
    let mut value = min_risk;
    if connectivity.canonical_available {
        value -= CANONICAL_ROUTE_BONUS;
    }
    let value = value.clamp(0.0, ROUTED_RISK_CEILING);

    let canonical_note = match connectivity.routes.iter().find(|r| r.canonical) {
        Some(route) if route.protocol == best.protocol => ", canonical route available".to_string(),
        Some(route) => format!(", canonical route available via {}", route.name),
        None => String::new(),
    };
    SubScore::new(
        "bridge_risk",
        value,
        format!(
            "{} route(s); lowest base risk {} via {} ({}){}",
            connectivity.routes.len(),
            min_risk,
            best.name,
            best.mechanism.as_str(),
            canonical_note
        ),
    )
}

/// Evaluate connectivity and bridge risk for a migration.
pub fn evaluate_bridge_risk(
    source: &str,
    target: &str,
    catalog: &BridgeCatalog,
) -> Result<(BridgeConnectivity, SubScore)> {
    let connectivity = find_routes(source, target, catalog)?;
    let score = bridge_risk_score(&connectivity);

    if connectivity.is_empty() {
        warn!(
            source = %connectivity.source,
            target = %connectivity.target,
            "No bridge route between chains"
        );
    } else {
        debug!(
            source = %connectivity.source,
            target = %connectivity.target,
            routes = connectivity.routes.len(),
            risk = score.value,
            "Bridge risk evaluated"
        );
    }

    Ok((connectivity, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ethereum_to_solana_prefers_cctp() {
        let (connectivity, score) =
            evaluate_bridge_risk("Ethereum", "Solana", BridgeCatalog::builtin()).unwrap();

        assert_eq!(connectivity.recommended().unwrap().protocol, "cctp");
        assert!(connectivity.canonical_available);
        assert_eq!(connectivity.min_base_risk, Some(10));
        assert_eq!(score.value, 0.0);
        // wormhole, layerzero, debridge also connect
        assert_eq!(connectivity.routes.len(), 4);
    }

    #[test]
    fn test_no_overlap_is_worst_case_not_error() {
        let (connectivity, score) =
            evaluate_bridge_risk("ethereum", "aptos", BridgeCatalog::builtin()).unwrap();

        assert!(connectivity.is_empty());
        assert!(!connectivity.canonical_available);
        assert_eq!(connectivity.min_base_risk, None);
        assert_eq!(score.value, NO_ROUTE_RISK);
    }

    #[test]
    fn test_routed_risk_below_no_route() {
        let catalog = BridgeCatalog::new(vec![BridgeProtocol::new(
            "rickety",
            "Rickety",
            TransferMechanism::LockAndMint,
            100,
            &["a", "b"],
        )]);
        let (_, score) = evaluate_bridge_risk("a", "b", &catalog).unwrap();
        assert_eq!(score.value, ROUTED_RISK_CEILING);
        assert!(score.value < NO_ROUTE_RISK);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        use TransferMechanism::*;
        let catalog = BridgeCatalog::new(vec![
            BridgeProtocol::new("zeta", "Zeta", MessagePassing, 20, &["a", "b"]),
            BridgeProtocol::new("alpha", "Alpha", MessagePassing, 20, &["a", "b"]),
            BridgeProtocol::new("wide", "Wide", MessagePassing, 20, &["a", "b", "c"]),
            BridgeProtocol::new("native", "Native", BurnAndMint, 20, &["a", "b"])
                .with_canonical_targets(&["b"]),
            BridgeProtocol::new("cheap", "Cheap", LockAndMint, 15, &["a", "b"]),
        ]);

        let connectivity = find_routes("a", "b", &catalog).unwrap();
        let order: Vec<&str> = connectivity.routes.iter().map(|r| r.protocol.as_str()).collect();
        assert_eq!(order, vec!["cheap", "native", "wide", "alpha", "zeta"]);

        let again = find_routes("A", " B ", &catalog).unwrap();
        assert_eq!(again, connectivity);
    }

    #[test]
    fn test_tie_break_uses_name_over_id() {
        use TransferMechanism::MessagePassing;
        let catalog = BridgeCatalog::new(vec![
            BridgeProtocol::new("a-proto", "Zeta", MessagePassing, 20, &["a", "b"]),
            BridgeProtocol::new("b-proto", "Alpha", MessagePassing, 20, &["a", "b"]),
        ]);

        let connectivity = find_routes("a", "b", &catalog).unwrap();
        let best = connectivity.recommended().unwrap();
        assert_eq!(best.name, "Alpha");
        assert_eq!(best.protocol, "b-proto");
    }

    #[test]
    fn test_rationale_names_canonical_route_when_not_recommended() {
        let (connectivity, score) =
            evaluate_bridge_risk("Fantom", "Solana", BridgeCatalog::builtin()).unwrap();

        assert_eq!(connectivity.recommended().unwrap().protocol, "layerzero");
        assert!(!connectivity.recommended().unwrap().canonical);
        assert_eq!(score.value, 10.0);
        assert!(score.rationale.contains("canonical route available via Wormhole"));
    }

    #[test]
    fn test_token_migration_complexity() {
        let catalog = BridgeCatalog::builtin();
        let rate =
            |s: &str, t: &str| token_migration_complexity(&find_routes(s, t, catalog).unwrap());

        assert_eq!(rate("ethereum", "base"), TokenMigrationComplexity::Low);
        // wormhole NTT connects fantom and solana
        assert_eq!(rate("fantom", "solana"), TokenMigrationComplexity::Medium);
        assert_eq!(rate("bsc", "solana"), TokenMigrationComplexity::Medium);
        assert_eq!(rate("ethereum", "aptos"), TokenMigrationComplexity::VeryHigh);

        let message_only = BridgeCatalog::new(vec![BridgeProtocol::new(
            "relay",
            "Relay",
            TransferMechanism::MessagePassing,
            30,
            &["ethereum", "near"],
        )]);
        let connectivity = find_routes("ethereum", "near", &message_only).unwrap();
        assert_eq!(token_migration_complexity(&connectivity), TokenMigrationComplexity::High);
    }

    #[test]
    fn test_invalid_pairs_rejected() {
        let catalog = BridgeCatalog::builtin();
        assert!(matches!(
            evaluate_bridge_risk("", "solana", catalog),
            Err(MigrationError::InvalidInput(_))
        ));
        assert!(matches!(
            evaluate_bridge_risk("Solana", "solana ", catalog),
            Err(MigrationError::InvalidInput(_))
        ));
    }
}
