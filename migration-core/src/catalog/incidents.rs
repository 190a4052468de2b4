//! Historical bridge exploits.
//!
//! Used to derive the incident adjustment fed to the composite scorer.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bridges::normalize_chain;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Risk points added per unrecovered incident.
pub const UNRECOVERED_INCIDENT_PENALTY: f64 = 10.0;

/// Risk points added per incident whose funds were recovered.
pub const RECOVERED_INCIDENT_PENALTY: f64 = 3.0;

/// Upper bound of the derived adjustment.
pub const MAX_INCIDENT_ADJUSTMENT: f64 = 30.0;

/// A known exploit against a bridge or chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct IncidentRecord {
    /// Bridge id or chain name (lower-case)
    pub subject: String,
    /// ISO date of the incident
    pub date: String,
    /// Loss in USD
    pub loss_usd: u64,
    /// Whether funds were recovered
    pub recovered: bool,
    /// Summary
    pub note: String,
}

static INCIDENTS: Lazy<Vec<IncidentRecord>> = Lazy::new(|| {
    vec![
        incident(
            "wormhole",
            "2022-02-02",
            320_000_000,
            true,
            "Solana VAA signature bypass. Patched, funds recovered.",
        ),
        incident(
            "ronin",
            "2022-03-23",
            625_000_000,
            false,
            "Axie Infinity bridge. Social engineering of validators.",
        ),
        incident(
            "nomad",
            "2022-08-01",
            190_000_000,
            false,
            "Initialization bug allowed anyone to drain.",
        ),
        incident(
            "harmony",
            "2022-06-23",
            100_000_000,
            false,
            "Horizon bridge. Compromised private keys.",
        ),
        incident(
            "multichain",
            "2023-07-06",
            126_000_000,
            false,
            "Funds drained from MPC addresses.",
        ),
    ]
});

fn incident(
    subject: &str,
    date: &str,
    loss_usd: u64,
    recovered: bool,
    note: &str,
) -> IncidentRecord {
    IncidentRecord {
        subject: subject.to_string(),
        date: date.to_string(),
        loss_usd,
        recovered,
        note: note.to_string(),
    }
}

/// All tracked incidents.
pub fn known_incidents() -> &'static [IncidentRecord] {
    INCIDENTS.as_slice()
}

/// Incidents whose subject is the given bridge id or chain name.
pub fn incidents_for(subject: &str) -> Vec<&'static IncidentRecord> {
    let subject = normalize_chain(subject);
    INCIDENTS.iter().filter(|i| i.subject == subject).collect()
}

/// Derive the signed incident adjustment for a chosen bridge and chain set.
///
/// Returns 0 when nothing matches.
pub fn incident_adjustment(bridge: Option<&str>, chains: &[&str]) -> f64 {
    let mut subjects: Vec<String> = chains.iter().map(|c| normalize_chain(c)).collect();
    if let Some(bridge) = bridge {
        subjects.push(normalize_chain(bridge));
    }
    subjects.sort();
    subjects.dedup();

    let total: f64 = INCIDENTS
        .iter()
        .filter(|i| subjects.contains(&i.subject))
        .map(|i| {
            if i.recovered {
                RECOVERED_INCIDENT_PENALTY
            } else {
                UNRECOVERED_INCIDENT_PENALTY
            }
        })
        .sum();

    let adjustment = total.min(MAX_INCIDENT_ADJUSTMENT);
    debug!(?bridge, ?chains, adjustment, "Derived incident adjustment");
    adjustment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_incidents_is_zero() {
        assert_eq!(incident_adjustment(Some("cctp"), &["ethereum", "solana"]), 0.0);
        assert_eq!(incident_adjustment(None, &[]), 0.0);
    }

    #[test]
    fn test_recovered_and_unrecovered() {
        assert_eq!(incident_adjustment(Some("wormhole"), &[]), RECOVERED_INCIDENT_PENALTY);
        assert_eq!(incident_adjustment(None, &["Harmony"]), UNRECOVERED_INCIDENT_PENALTY);
        assert_eq!(
            incident_adjustment(Some("Wormhole"), &["harmony", "ethereum"]),
            RECOVERED_INCIDENT_PENALTY + UNRECOVERED_INCIDENT_PENALTY
        );
    }

    #[test]
    fn test_duplicate_subjects_count_once() {
        assert_eq!(
            incident_adjustment(Some("harmony"), &["harmony"]),
            UNRECOVERED_INCIDENT_PENALTY
        );
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(known_incidents().len(), 5);
        assert_eq!(incidents_for("Ronin").len(), 1);
        assert!(incidents_for("solana").is_empty());
    }
}
