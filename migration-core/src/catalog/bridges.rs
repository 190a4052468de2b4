//! Bridge protocol catalog.
//!
//! Risk ratings are static, lower is safer. `canonical_targets` lists the
//! chains a protocol can deliver a first-class (non-wrapped) asset to.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// How a bridge moves value between chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum TransferMechanism {
    /// Burn on source, mint natively on target
    BurnAndMint,
    /// Lock on source, mint a representation on target
    LockAndMint,
    /// Generic cross-chain message passing
    MessagePassing,
}

impl TransferMechanism {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BurnAndMint => "burn-and-mint",
            Self::LockAndMint => "lock-and-mint",
            Self::MessagePassing => "message-passing",
        }
    }
}

/// A cross-chain bridge protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BridgeProtocol {
    /// Stable identifier, used as the strategy tag
    pub id: String,
    /// Display name
    pub name: String,
    /// Transfer mechanism
    pub mechanism: TransferMechanism,
    /// Base risk rating (0-100, lower = safer)
    pub base_risk: u8,
    /// Lower-case names of supported chains
    pub supported_chains: BTreeSet<String>,
    /// Chains reachable through a canonical/native-transfer route
    pub canonical_targets: BTreeSet<String>,
    /// Whether the protocol offers a native token transfer framework
    #[serde(default)]
    pub native_token_transfers: bool,
    /// Free-text note
    pub note: String,
}

impl BridgeProtocol {
    /// Create a protocol; chain names are case-folded.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mechanism: TransferMechanism,
        base_risk: u8,
        supported_chains: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mechanism,
            base_risk: base_risk.min(100),
            supported_chains: supported_chains
                .iter()
                .map(|c| normalize_chain(c))
                .collect(),
            canonical_targets: BTreeSet::new(),
            native_token_transfers: false,
            note: String::new(),
        }
    }

    /// Mark chains as reachable through a canonical route.
    pub fn with_canonical_targets(mut self, chains: &[&str]) -> Self {
        self.canonical_targets = chains.iter().map(|c| normalize_chain(c)).collect();
        self
    }

    /// Mark the protocol as offering native token transfers.
    pub fn with_native_token_transfers(mut self) -> Self {
        self.native_token_transfers = true;
        self
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Whether the protocol supports a (case-folded) chain.
    pub fn supports(&self, chain: &str) -> bool {
        self.supported_chains.contains(chain)
    }

    /// Whether the protocol connects both chains.
    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.supports(source) && self.supports(target)
    }

    /// Whether a transfer into `target` is canonical.
    pub fn is_canonical_for(&self, target: &str) -> bool {
        self.canonical_targets.contains(target)
    }
}

/// Read-only collection of bridge protocols.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeCatalog {
    protocols: Vec<BridgeProtocol>,
}

static BUILTIN: Lazy<BridgeCatalog> = Lazy::new(|| BridgeCatalog::new(default_protocols()));

impl BridgeCatalog {
    /// Create a catalog from a list of protocols.
    pub fn new(protocols: Vec<BridgeProtocol>) -> Self {
        Self { protocols }
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static BridgeCatalog {
        &*BUILTIN
    }

    /// All protocols.
    pub fn protocols(&self) -> &[BridgeProtocol] {
        &self.protocols
    }

    /// Look up a protocol by id.
    pub fn get(&self, id: &str) -> Option<&BridgeProtocol> {
        self.protocols.iter().find(|p| p.id == id)
    }

    /// Number of protocols.
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

/// Case-fold and trim a chain name.
pub fn normalize_chain(name: &str) -> String {
    name.trim().to_lowercase()
}

fn default_protocols() -> Vec<BridgeProtocol> {
    vec![
        BridgeProtocol::new(
            "wormhole",
            "Wormhole",
            TransferMechanism::MessagePassing,
            25,
            &[
                "solana", "ethereum", "bsc", "polygon", "arbitrum", "optimism", "avalanche",
                "base", "sui", "fantom",
            ],
        )
        .with_canonical_targets(&["solana"])
        .with_native_token_transfers()
        .with_note("NTT support; Sunrise gives canonical Solana assets with day-one liquidity"),
        BridgeProtocol::new(
            "layerzero",
            "LayerZero",
            TransferMechanism::MessagePassing,
            20,
            &[
                "ethereum", "bsc", "polygon", "arbitrum", "optimism", "avalanche", "base",
                "fantom", "solana",
            ],
        ),
        BridgeProtocol::new(
            "cctp",
            "CCTP (Circle)",
            TransferMechanism::BurnAndMint,
            10,
            &[
                "ethereum", "arbitrum", "optimism", "base", "polygon", "solana", "avalanche",
            ],
        )
        .with_canonical_targets(&[
            "ethereum", "arbitrum", "optimism", "base", "polygon", "solana", "avalanche",
        ])
        .with_note("USDC-only, official Circle bridge"),
        BridgeProtocol::new(
            "axelar",
            "Axelar",
            TransferMechanism::MessagePassing,
            30,
            &[
                "ethereum", "polygon", "avalanche", "fantom", "arbitrum", "optimism", "base",
            ],
        ),
        BridgeProtocol::new(
            "debridge",
            "deBridge",
            TransferMechanism::LockAndMint,
            35,
            &[
                "ethereum", "bsc", "polygon", "arbitrum", "solana", "avalanche", "base",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = BridgeCatalog::builtin();
        assert_eq!(catalog.len(), 5);

        let cctp = catalog.get("cctp").unwrap();
        assert_eq!(cctp.mechanism, TransferMechanism::BurnAndMint);
        assert!(cctp.connects("ethereum", "solana"));
        assert!(!cctp.supports("bsc"));
    }

    #[test]
    fn test_chain_names_are_case_folded() {
        let protocol =
            BridgeProtocol::new("x", "X", TransferMechanism::LockAndMint, 50, &[" Ethereum "]);
        assert!(protocol.supports("ethereum"));
    }

    #[test]
    fn test_wormhole_canonical_only_into_solana() {
        let wormhole = BridgeCatalog::builtin().get("wormhole").unwrap();
        assert!(wormhole.is_canonical_for("solana"));
        assert!(!wormhole.is_canonical_for("ethereum"));
        assert!(wormhole.native_token_transfers);
    }
}
