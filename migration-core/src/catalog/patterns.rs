//! Contract pattern catalog.
//!
//! Maps common EVM contract idioms to their Solana counterparts together with
//! a 1-10 porting difficulty and the semantic differences that make the port
//! non-mechanical.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A recognized contract design idiom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ContractPattern {
    /// Identifier (e.g. "AMM/DEX")
    pub id: String,
    /// Short description
    pub description: String,
    /// Destination-platform equivalent
    pub equivalent: String,
    /// Porting difficulty, 1-10
    pub difficulty: u8,
    /// Migration notes
    pub notes: String,
    /// Key semantic differences
    pub key_differences: Vec<String>,
}

/// Read-only collection of contract patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<ContractPattern>,
}

static BUILTIN: Lazy<PatternCatalog> = Lazy::new(|| PatternCatalog::new(default_patterns()));

impl PatternCatalog {
    /// Create a catalog from a list of patterns.
    pub fn new(patterns: Vec<ContractPattern>) -> Self {
        Self { patterns }
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static PatternCatalog {
        &*BUILTIN
    }

    /// All patterns.
    pub fn patterns(&self) -> &[ContractPattern] {
        &self.patterns
    }

    /// Find a pattern by identifier.
    ///
    /// Matching ignores case, whitespace, `-` and `/`, so `erc20` finds `ERC-20`.
    pub fn find(&self, id: &str) -> Option<&ContractPattern> {
        let key = pattern_key(id);
        if key.is_empty() {
            return None;
        }
        self.patterns.iter().find(|p| pattern_key(&p.id) == key)
    }

    /// Identifiers of all patterns, in catalog order.
    pub fn ids(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.id.as_str()).collect()
    }
}

fn pattern_key(id: &str) -> String {
    id.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '/' && *c != '_')
        .flat_map(|c| c.to_uppercase())
        .collect()
}

fn pattern(
    id: &str,
    description: &str,
    equivalent: &str,
    difficulty: u8,
    notes: &str,
    key_differences: &[&str],
) -> ContractPattern {
    ContractPattern {
        id: id.to_string(),
        description: description.to_string(),
        equivalent: equivalent.to_string(),
        difficulty,
        notes: notes.to_string(),
        key_differences: key_differences.iter().map(|d| d.to_string()).collect(),
    }
}

fn default_patterns() -> Vec<ContractPattern> {
    vec![
        pattern(
            "ERC-20",
            "Fungible token standard",
            "SPL Token / Token-2022",
            2,
            "Direct mapping exists. \
             Token-2022 adds extensions (transfer fees, confidential transfers).",
            &[
                "ERC-20 is per-contract; SPL Token is a single program for all tokens",
                "Balances stored in Associated Token Accounts, not contract storage",
                "Mint authority replaces owner/admin pattern",
                "No approve/transferFrom; use delegate instead",
            ],
        ),
        pattern(
            "ERC-721",
            "Non-fungible token (NFT)",
            "Metaplex Token Standard / Token-2022 NFT",
            3,
            "Metaplex provides NFT standards with metadata, collections, and programmable NFTs.",
            &[
                "NFT = SPL token with supply of 1 and 0 decimals",
                "Metadata stored in separate Metaplex metadata account",
                "Collection verification via Metaplex Certified Collections",
                "Royalty enforcement via Programmable NFTs",
            ],
        ),
        pattern(
            "AMM/DEX",
            "Automated Market Maker / Decentralized Exchange",
            "Raydium CLMM / Orca Whirlpool / Custom Anchor program",
            8,
            "Major architectural differences. Solana AMMs use account-based pool state.",
            &[
                "Pool state in PDAs, not contract storage slots",
                "Token reserves in SPL token accounts owned by pool PDA",
                "Swap instruction instead of swap function; CPI to SPL Token for transfers",
                "No reentrancy risk (single-threaded per transaction)",
                "Compute unit limits replace gas optimization",
            ],
        ),
        pattern(
            "Lending/Borrowing",
            "Lending protocol (Aave/Compound-like)",
            "Solend / MarginFi / Kamino / Custom",
            9,
            "Complex state management. Interest rate models need careful reimplementation.",
            &[
                "User positions stored in separate accounts, not mappings",
                "Oracle integration via Pyth/Switchboard instead of Chainlink",
                "Liquidation bot architecture differs (clock-based)",
                "Flash loans possible via CPI but with a different pattern",
            ],
        ),
        pattern(
            "Staking",
            "Token staking / yield farming",
            "SPL Stake Pool / Custom Anchor staking",
            4,
            "Relatively straightforward. Solana has native staking infrastructure.",
            &[
                "Stake accounts are first-class objects for SOL staking",
                "SPL staking uses token accounts plus PDA-based reward tracking",
                "No block.timestamp; use the Clock sysvar",
                "Reward distribution via separate claim instruction",
            ],
        ),
        pattern(
            "Governance/DAO",
            "On-chain governance (Governor/Timelock)",
            "Realms (SPL Governance) / Squads",
            5,
            "Realms is the standard governance framework. Squads for multisig.",
            &[
                "Proposals, votes, and execution are separate accounts",
                "Realm = community + council governance",
                "Token-weighted voting via voter weight plugins",
                "Squads v4 for multisig treasury management",
            ],
        ),
        pattern(
            "Vault/Yield",
            "Yield vault (ERC-4626 / Yearn-like)",
            "Kamino / Custom Anchor vault",
            6,
            "No ERC-4626 standard on Solana. Custom implementation needed.",
            &[
                "Vault shares as SPL tokens (mint/burn pattern)",
                "Strategy execution via CPI to DEX/lending programs",
                "No composable vault standard; each protocol is custom",
                "Rebalancing triggered by cranks (off-chain bots)",
            ],
        ),
        pattern(
            "Bridge",
            "Cross-chain bridge contract",
            "Wormhole NTT / Custom bridge program",
            9,
            "Use the Wormhole NTT SDK for standard bridge needs. Custom bridges are complex.",
            &[
                "Guardian network for message verification",
                "NTT Manager program handles burn-mint flow",
                "Verified Action Approvals instead of merkle proofs",
                "Rate limiting built into the NTT framework",
            ],
        ),
        pattern(
            "Oracle Consumer",
            "Contract consuming price feeds",
            "Pyth / Switchboard",
            2,
            "Pyth is the primary Solana oracle. Drop-in replacement for Chainlink.",
            &[
                "Price accounts passed as instruction accounts",
                "Pull oracle model; prices updated on demand",
                "Confidence intervals included in prices",
                "Switchboard for custom data feeds / VRF",
            ],
        ),
        pattern(
            "Multisig",
            "Multi-signature wallet",
            "Squads v4",
            2,
            "Squads is the standard Solana multisig. Well-audited and widely used.",
            &[
                "Squads manages a vault PDA that holds assets",
                "Transaction proposals created as separate accounts",
                "Members approve by signing an approve instruction",
                "Built-in spending limits and time locks",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_normalizes_identifier() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.find("erc20").unwrap().id, "ERC-20");
        assert_eq!(catalog.find("amm / dex").unwrap().id, "AMM/DEX");
        assert_eq!(catalog.find("oracle_consumer").unwrap().id, "Oracle Consumer");
    }

    #[test]
    fn test_find_rejects_partial_match() {
        let catalog = PatternCatalog::builtin();
        assert!(catalog.find("AMM").is_none());
        assert!(catalog.find("").is_none());
        assert!(catalog.find("UNKNOWN_X").is_none());
    }

    #[test]
    fn test_difficulties_in_range() {
        for p in PatternCatalog::builtin().patterns() {
            assert!((1..=10).contains(&p.difficulty), "{} out of range", p.id);
            assert!(!p.key_differences.is_empty());
        }
    }
}
