//! Migration Advisor
//!
//! Wraps the scoring engine with the pieces a running service needs:
//!
//! - **Data sources**: async seam for chain health providers
//! - **Input cache**: short-lived TTL cache of fetched records
//! - **Incident history**: exploit-derived risk adjustment
//! - **Alerts**: threshold alerts on both chains
//! - **Audit**: SHA-256 digest of every evaluated input
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  MigrationAdvisor                    │
//! │                                                      │
//! │  ┌─────────────┐   ┌────────────┐   ┌────────────┐   │
//! │  │ DataSource  │──▶│ InputCache │──▶│ core eval  │   │
//! │  └─────────────┘   └────────────┘   └─────┬──────┘   │
//! │                                           │          │
//! │                        ┌──────────┐  ┌────▼─────┐    │
//! │                        │  Alerts  │──│  Report  │    │
//! │                        └──────────┘  └──────────┘    │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod advisor;
pub mod alerts;
pub mod cache;
pub mod config;
pub mod source;
pub mod types;

// Re-export main types
pub use advisor::{input_digest, MigrationAdvisor};
pub use alerts::{check_alerts, AlertMetric, AlertRule, AlertSeverity, MigrationAlert};
pub use cache::{CacheStats, InputCache};
pub use config::{AdvisorConfig, AlertConfig, CacheConfig};
pub use source::{ChainDataSource, SourceError, StaticChainDataSource};
pub use types::*;
