//! Configuration for the migration advisor.

use serde::{Deserialize, Serialize};

use migration_core::ScoringPolicy;

use crate::alerts::{default_rules, AlertRule};
use crate::types::{AdvisorError, Result};

/// Configuration for a migration advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Advisor ID, stamped on every report
    pub advisor_id: String,
    /// Composite scoring weights and bands
    pub scoring: ScoringPolicy,
    /// Input cache configuration
    pub cache: CacheConfig,
    /// Alert configuration
    pub alerts: AlertConfig,
    /// Derive an incident adjustment from exploit history when the request has none
    pub apply_incident_history: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            advisor_id: "migration-advisor".to_string(),
            scoring: ScoringPolicy::default(),
            cache: CacheConfig::default(),
            alerts: AlertConfig::default(),
            apply_incident_history: true,
        }
    }
}

impl AdvisorConfig {
    /// Create a new config with advisor ID.
    pub fn new(advisor_id: impl Into<String>) -> Self {
        Self {
            advisor_id: advisor_id.into(),
            ..Default::default()
        }
    }

    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| AdvisorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| AdvisorError::Config(e.to_string()))
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.advisor_id.trim().is_empty() {
            return Err(AdvisorError::Config("advisor_id must not be empty".to_string()));
        }
        self.scoring
            .validate()
            .map_err(|e| AdvisorError::Config(e.to_string()))?;
        for rule in &self.alerts.rules {
            if !rule.threshold.is_finite() {
                return Err(AdvisorError::Config(format!(
                    "alert rule '{}' has a non-finite threshold",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

/// Input cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live of fetched records (seconds)
    pub ttl_secs: u64,
    /// Maximum cached chains, 0 disables caching
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300, // 5 minutes
            max_entries: 256,
        }
    }
}

/// Alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Run alert rules on every evaluation
    pub enabled: bool,
    /// Rules to apply
    pub rules: Vec<AlertRule>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: default_rules(),
        }
    }
}
