//! Request, report and error types for the advisor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use migration_core::{MigrationError, MigrationVerdict};

use crate::alerts::MigrationAlert;
use crate::source::SourceError;

/// A migration to evaluate, named by chain rather than by record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRequest {
    /// Chain the project lives on today
    pub source_chain: String,
    /// Chain the project would move to
    pub target_chain: String,
    /// Contract pattern identifiers
    pub patterns: Vec<String>,
    /// Incident adjustment supplied by the caller; derived when absent
    #[serde(default)]
    pub incident_adjustment: Option<f64>,
}

impl MigrationRequest {
    /// Create a request.
    pub fn new(
        source_chain: impl Into<String>,
        target_chain: impl Into<String>,
        patterns: Vec<String>,
    ) -> Self {
        Self {
            source_chain: source_chain.into(),
            target_chain: target_chain.into(),
            patterns,
            incident_adjustment: None,
        }
    }

    /// Supply an explicit incident adjustment.
    pub fn with_incident_adjustment(mut self, adjustment: f64) -> Self {
        self.incident_adjustment = Some(adjustment);
        self
    }
}

/// Outcome of an advisor evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Advisor that produced the report
    pub advisor_id: String,
    /// SHA-256 (hex) of the evaluated inputs
    pub input_digest: String,
    /// Core verdict
    pub verdict: MigrationVerdict,
    /// Threshold alerts on either chain, most severe first
    pub alerts: Vec<MigrationAlert>,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

/// Error types for the advisor.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// Chain data could not be fetched
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Evaluation rejected its inputs
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] MigrationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inputs could not be serialized for the audit digest
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
