//! Migration advisor.
//!
//! Fetches chain records through the cache, derives the incident adjustment,
//! runs the core evaluation, and stamps the result with an input digest.

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use migration_core::bridge_risk::find_routes;
use migration_core::{
    evaluate_migration, incident_adjustment, BridgeCatalog, ChainHealthRecord, MigrationInput,
    ScoringPolicy,
};

use crate::alerts::{check_alerts, sort_alerts};
use crate::cache::{CacheStats, InputCache};
use crate::config::AdvisorConfig;
use crate::source::ChainDataSource;
use crate::types::{EvaluationReport, MigrationRequest, Result};

/// SHA-256 (hex) over the serialized evaluation inputs and policy.
pub fn input_digest(input: &MigrationInput, policy: &ScoringPolicy) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(input)?);
    hasher.update(serde_json::to_vec(policy)?);
    Ok(hex::encode(hasher.finalize()))
}

/// Orchestrates data fetching and evaluation.
pub struct MigrationAdvisor {
    config: AdvisorConfig,
    source: Arc<dyn ChainDataSource>,
    cache: InputCache,
    catalog: BridgeCatalog,
}

impl MigrationAdvisor {
    /// Create an advisor over a data source, validating the config.
    pub fn new(config: AdvisorConfig, source: Arc<dyn ChainDataSource>) -> Result<Self> {
        config.validate()?;
        let cache = InputCache::from_config(&config.cache);
        Ok(Self {
            config,
            source,
            cache,
            catalog: BridgeCatalog::builtin().clone(),
        })
    }

    /// Replace the bridge catalog.
    pub fn with_catalog(mut self, catalog: BridgeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop expired cache entries.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_expired(Utc::now())
    }

    /// Fetch a chain record, serving from cache when fresh.
    pub async fn chain_record(&self, chain: &str) -> Result<ChainHealthRecord> {
        if let Some(record) = self.cache.get(chain) {
            debug!(chain, "Chain record served from cache");
            return Ok(record);
        }

        let record = self.source.fetch_chain_health(chain).await?;
        debug!(chain, source = self.source.id(), "Chain record fetched");
        self.cache.insert(record.clone());
        Ok(record)
    }

    /// Incident adjustment for the request.
    ///
    /// An explicit value wins; otherwise exploit history of the recommended
    /// route and both chains is used when enabled.
    fn resolve_incident_adjustment(&self, request: &MigrationRequest) -> Result<Option<f64>> {
        if request.incident_adjustment.is_some() || !self.config.apply_incident_history {
            return Ok(request.incident_adjustment);
        }

        let connectivity =
            find_routes(&request.source_chain, &request.target_chain, &self.catalog)?;
        let bridge = connectivity.recommended().map(|r| r.protocol.as_str());
        let adjustment = incident_adjustment(
            bridge,
            &[connectivity.source.as_str(), connectivity.target.as_str()],
        );
        Ok(Some(adjustment))
    }

    /// Evaluate a migration end to end.
    pub async fn evaluate(&self, request: &MigrationRequest) -> Result<EvaluationReport> {
        let (source, target) = tokio::try_join!(
            self.chain_record(&request.source_chain),
            self.chain_record(&request.target_chain),
        )?;

        let input = MigrationInput {
            source,
            target,
            patterns: request.patterns.clone(),
            incident_adjustment: self.resolve_incident_adjustment(request)?,
        };
        let input_digest = input_digest(&input, &self.config.scoring)?;
        let verdict = evaluate_migration(&input, &self.catalog, &self.config.scoring)?;

        let mut alerts = Vec::new();
        if self.config.alerts.enabled {
            alerts.extend(check_alerts(&input.source, &self.config.alerts.rules));
            alerts.extend(check_alerts(&input.target, &self.config.alerts.rules));
            sort_alerts(&mut alerts);
        }

        info!(
            advisor_id = %self.config.advisor_id,
            source = %request.source_chain,
            target = %request.target_chain,
            grade = verdict.composite.feasibility_grade.as_str(),
            level = verdict.composite.risk_level.as_str(),
            alerts = alerts.len(),
            digest = %input_digest,
            "Evaluation complete"
        );

        Ok(EvaluationReport {
            advisor_id: self.config.advisor_id.clone(),
            input_digest,
            verdict,
            alerts,
            evaluated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertSeverity;
    use crate::source::{SourceError, StaticChainDataSource};
    use crate::types::AdvisorError;
    use migration_core::{MigrationError, NO_VIABLE_ROUTE};

    fn fixture() -> Arc<StaticChainDataSource> {
        Arc::new(
            StaticChainDataSource::new("fixture")
                .with_record(ChainHealthRecord::new("Fantom", 4.0e8, -22.0, 60).unwrap())
                .with_record(ChainHealthRecord::new("Solana", 9.0e9, 14.0, 350).unwrap())
                .with_record(ChainHealthRecord::new("Harmony", 2.0e7, -12.0, 15).unwrap())
                .with_record(ChainHealthRecord::new("Aptos", 1.0e9, 3.0, 90).unwrap()),
        )
    }

    fn advisor(source: Arc<StaticChainDataSource>) -> MigrationAdvisor {
        MigrationAdvisor::new(AdvisorConfig::new("test-advisor"), source).unwrap()
    }

    fn request(source: &str, target: &str) -> MigrationRequest {
        MigrationRequest::new(source, target, vec!["ERC-20".to_string(), "Staking".to_string()])
    }

    #[tokio::test]
    async fn test_evaluate_fantom_to_solana() {
        let advisor = advisor(fixture());
        let report = advisor.evaluate(&request("Fantom", "Solana")).await.unwrap();

        assert_eq!(report.advisor_id, "test-advisor");
        assert_eq!(report.input_digest.len(), 64);
        assert_eq!(report.verdict.playbook.phases.len(), 4);
        // fantom is down 22%: high, medium and low decline alerts
        assert_eq!(report.alerts.len(), 3);
        assert_eq!(report.alerts[0].severity, AlertSeverity::High);
    }

    #[tokio::test]
    async fn test_cache_avoids_refetch() {
        let source = fixture();
        let advisor = advisor(source.clone());

        let first = advisor.evaluate(&request("Fantom", "Solana")).await.unwrap();
        let second = advisor.evaluate(&request("fantom", "solana")).await.unwrap();

        assert_eq!(source.call_count(), 2);
        assert_eq!(advisor.cache_stats().hits, 2);
        assert_eq!(first.input_digest, second.input_digest);
    }

    #[tokio::test]
    async fn test_incident_history_applied() {
        let advisor = advisor(fixture());
        let report = advisor.evaluate(&request("Harmony", "Solana")).await.unwrap();
        // harmony chain exploit; no route connects harmony, so no bridge term
        assert_eq!(report.verdict.composite.incident_adjustment, 10.0);

        let explicit = advisor
            .evaluate(&request("Harmony", "Solana").with_incident_adjustment(0.0))
            .await
            .unwrap();
        assert_eq!(explicit.verdict.composite.incident_adjustment, 0.0);
        assert_ne!(report.input_digest, explicit.input_digest);
    }

    #[tokio::test]
    async fn test_incident_history_disabled() {
        let mut config = AdvisorConfig::new("quiet");
        config.apply_incident_history = false;
        config.alerts.enabled = false;
        let advisor = MigrationAdvisor::new(config, fixture()).unwrap();

        let report = advisor.evaluate(&request("Harmony", "Solana")).await.unwrap();
        assert_eq!(report.verdict.composite.incident_adjustment, 0.0);
        assert!(report.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_no_route_still_reports() {
        let advisor = advisor(fixture());
        let report = advisor.evaluate(&request("Fantom", "Aptos")).await.unwrap();
        assert_eq!(report.verdict.playbook.recommended_bridge_strategy, NO_VIABLE_ROUTE);
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let advisor = advisor(fixture());

        let missing = advisor.evaluate(&request("Fantom", "Tron")).await.unwrap_err();
        assert!(matches!(missing, AdvisorError::Source(SourceError::NotFound(_))));

        let unknown = advisor
            .evaluate(&MigrationRequest::new("Fantom", "Solana", vec!["UNKNOWN_X".to_string()]))
            .await
            .unwrap_err();
        assert!(matches!(
            unknown,
            AdvisorError::Evaluation(MigrationError::UnknownPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AdvisorConfig::default();
        config.advisor_id = String::new();
        assert!(MigrationAdvisor::new(config, fixture()).is_err());
    }
}
