//! Configuration for the TaskRank service.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use taskrank_core::{Result, TaskRankError};
use taskrank_engine::ScoringWeights;

/// Service configuration, usually read from `config.yaml`.
///
/// ```yaml
/// bind_addr: "127.0.0.1:8000"
/// suggestion_limit: 3
/// max_body_bytes: 1048576
/// scoring:
///   importance: 0.4
///   urgency: 0.3
///   effort: 0.15
///   dependency: 0.15
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP service listens on
    pub bind_addr: SocketAddr,

    /// Number of tasks returned by the suggest endpoint
    pub suggestion_limit: usize,

    /// Largest accepted request body
    pub max_body_bytes: usize,

    /// Weights for the composite score
    pub scoring: ScoringWeights,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            suggestion_limit: 3,
            max_body_bytes: 1024 * 1024,
            scoring: ScoringWeights::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file. Omitted fields keep their defaults.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TaskRankError::config_not_found_with_source(path, e))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| TaskRankError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.suggestion_limit == 0 {
            return Err(TaskRankError::config_validation("suggestion_limit must be at least 1"));
        }
        if self.max_body_bytes == 0 {
            return Err(TaskRankError::config_validation("max_body_bytes must be positive"));
        }
        Ok(())
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringWeights) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}
