//! Static read-only catalogs.
//!
//! Each catalog is built once on first use and never mutated afterwards, so
//! concurrent evaluations can share it without synchronization.

pub mod bridges;
pub mod incidents;
pub mod patterns;

pub use bridges::{normalize_chain, BridgeCatalog, BridgeProtocol, TransferMechanism};
pub use incidents::{incident_adjustment, incidents_for, known_incidents, IncidentRecord};
pub use patterns::{ContractPattern, PatternCatalog};
