//! Chain data sources.
//!
//! This module defines the `ChainDataSource` trait, the seam between the
//! advisor and whatever service supplies chain health records.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use migration_core::{normalize_chain, ChainHealthRecord};

/// Error types for chain data fetches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The source has no data for the chain
    #[error("Chain not found: {0}")]
    NotFound(String),

    /// The source is not reachable
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The source returned a record that failed validation
    #[error("Invalid data for {chain}: {reason}")]
    InvalidData { chain: String, reason: String },
}

/// Supplier of chain health records.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Get the source identifier.
    fn id(&self) -> &str;

    /// Fetch the current health record of a chain.
    async fn fetch_chain_health(&self, chain: &str) -> Result<ChainHealthRecord, SourceError>;
}

/// In-memory data source.
///
/// Serves fixed records; used for offline runs and tests.
pub struct StaticChainDataSource {
    source_id: String,
    records: HashMap<String, ChainHealthRecord>,
    available: AtomicBool,
    call_count: AtomicU32,
}

impl StaticChainDataSource {
    /// Create an empty source.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            records: HashMap::new(),
            available: AtomicBool::new(true),
            call_count: AtomicU32::new(0),
        }
    }

    /// Add a record, keyed by its case-folded chain name.
    pub fn with_record(mut self, record: ChainHealthRecord) -> Self {
        self.records.insert(normalize_chain(&record.name), record);
        self
    }

    /// Set availability.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Number of fetches served or refused.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count.
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for StaticChainDataSource {
    fn default() -> Self {
        Self::new("static")
    }
}

#[async_trait]
impl ChainDataSource for StaticChainDataSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    async fn fetch_chain_health(&self, chain: &str) -> Result<ChainHealthRecord, SourceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable(self.source_id.clone()));
        }

        let record = self
            .records
            .get(&normalize_chain(chain))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(chain.to_string()))?;

        record.validate().map_err(|e| SourceError::InvalidData {
            chain: chain.to_string(),
            reason: e.to_string(),
        })?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solana() -> ChainHealthRecord {
        ChainHealthRecord::new("Solana", 9.0e9, 14.0, 350).unwrap()
    }

    #[tokio::test]
    async fn test_static_source_lookup() {
        let source = StaticChainDataSource::new("fixture").with_record(solana());

        assert_eq!(source.id(), "fixture");
        let record = source.fetch_chain_health(" SOLANA ").await.unwrap();
        assert_eq!(record.name, "Solana");
        assert_eq!(source.call_count(), 1);

        let err = source.fetch_chain_health("aptos").await.unwrap_err();
        assert_eq!(err, SourceError::NotFound("aptos".to_string()));
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_static_source_unavailable() {
        let source = StaticChainDataSource::default()
            .with_record(solana())
            .with_available(false);

        assert!(matches!(
            source.fetch_chain_health("solana").await,
            Err(SourceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_static_source_rejects_bad_record() {
        let mut broken = solana();
        broken.tvl_usd = -1.0;
        let source = StaticChainDataSource::default().with_record(broken);

        assert!(matches!(
            source.fetch_chain_health("solana").await,
            Err(SourceError::InvalidData { .. })
        ));
    }
}
