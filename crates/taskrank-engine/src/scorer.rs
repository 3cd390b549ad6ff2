//! Composite task scoring.
//!
//! This module combines the four normalized factors from [`crate::factors`]
//! into a single explainable score on a 0-100 scale.
//!
//! ## Scoring Formula
//!
//! Score = 100 × (Importance × 0.4 + Urgency × 0.3 + Effort × 0.15 + Dependency × 0.15)
//!
//! rounded to two decimal places.
//!
//! ## Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use taskrank_core::Task;
//! use taskrank_engine::graph::compute_dependency_counts;
//! use taskrank_engine::scorer::{ScoringWeights, TaskScorer};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
//! let tasks = vec![Task::new(0i64).with_importance(10i64).with_due_date(today)];
//! let counts = compute_dependency_counts(&tasks);
//!
//! let scorer = TaskScorer::with_weights(ScoringWeights::default());
//! let result = scorer.score_on(&tasks[0], &counts, today);
//! assert_eq!(result.score, 85.0);
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskrank_core::{Result, Task, TaskId, TaskRankError};

use crate::factors::{Factor, NormalizedFactors, Urgency};
use crate::graph::DependencyCounts;

/// Default weight for importance component in scoring.
const DEFAULT_IMPORTANCE_WEIGHT: f64 = 0.4;

/// Default weight for urgency component in scoring.
const DEFAULT_URGENCY_WEIGHT: f64 = 0.3;

/// Default weight for effort component in scoring.
const DEFAULT_EFFORT_WEIGHT: f64 = 0.15;

/// Default weight for dependency component in scoring.
const DEFAULT_DEPENDENCY_WEIGHT: f64 = 0.15;

/// Allowed distance of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Score at or above which a task is high priority.
pub const HIGH_PRIORITY_THRESHOLD: f64 = 70.0;

/// Score at or above which a task is medium priority.
pub const MEDIUM_PRIORITY_THRESHOLD: f64 = 40.0;

/// Weights applied to each normalized factor.
///
/// Weights should sum to 1.0 so that scores span the full 0-100 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight for importance component (default: 0.4)
    pub importance: f64,

    /// Weight for urgency component (default: 0.3)
    pub urgency: f64,

    /// Weight for effort component (default: 0.15)
    pub effort: f64,

    /// Weight for dependency component (default: 0.15)
    pub dependency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            importance: DEFAULT_IMPORTANCE_WEIGHT,
            urgency: DEFAULT_URGENCY_WEIGHT,
            effort: DEFAULT_EFFORT_WEIGHT,
            dependency: DEFAULT_DEPENDENCY_WEIGHT,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.importance + self.urgency + self.effort + self.dependency
    }

    /// Validate that weights are non-negative and sum to approximately 1.0.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("importance", self.importance),
            ("urgency", self.urgency),
            ("effort", self.effort),
            ("dependency", self.dependency),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(TaskRankError::config_validation(format!(
                "{name} weight must be a non-negative number, got {value}"
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(TaskRankError::config_validation(format!(
                "Scoring weights must sum to 1.0, got {sum:.3}"
            )));
        }

        Ok(())
    }

    /// Load weights from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TaskRankError::config_not_found_with_source(path, e))?;
        let weights: Self = serde_yaml::from_str(&content).map_err(|e| TaskRankError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        weights.validate()?;
        Ok(weights)
    }

    /// Save weights to a YAML file.
    pub fn to_yaml(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| TaskRankError::internal(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| TaskRankError::io("writing weights", path, e))?;
        Ok(())
    }
}

/// Display banding of scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_PRIORITY_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_PRIORITY_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Breakdown of a score into its four labeled parts.
///
/// Renders as
/// `Importance: 7.0/10 => 70.0; Urgency: OVERDUE; Effort benefit: 2.0h => 95.0; Dependency impact: 0 => 0.0`.
///
/// Importance and hours always carry a fractional digit; the dependent
/// count is a whole number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreExplanation {
    pub importance: Factor,
    pub urgency: Urgency,
    pub effort: Factor,
    pub dependency: Factor,
}

impl From<NormalizedFactors> for ScoreExplanation {
    fn from(factors: NormalizedFactors) -> Self {
        Self {
            importance: factors.importance,
            urgency: factors.urgency,
            effort: factors.effort,
            dependency: factors.dependency,
        }
    }
}

impl ScoreExplanation {
    /// Urgency part: `OVERDUE` or a percentage.
    pub fn urgency_label(&self) -> String {
        if self.urgency.overdue {
            "OVERDUE".to_string()
        } else {
            format!("{:.1}", percent(self.urgency.value))
        }
    }
}

impl std::fmt::Display for ScoreExplanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Importance: {:?}/10 => {:.1}; Urgency: {}; Effort benefit: {:?}h => {:.1}; Dependency impact: {} => {:.1}",
            self.importance.raw,
            percent(self.importance.value),
            self.urgency_label(),
            self.effort.raw,
            percent(self.effort.value),
            self.dependency.raw,
            percent(self.dependency.value),
        )
    }
}

impl Serialize for ScoreExplanation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Score of a single task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub id: TaskId,
    /// Score in `[0, 100]`, rounded to two decimals
    pub score: f64,
    pub explanation: ScoreExplanation,
}

impl ScoreResult {
    pub fn band(&self) -> PriorityBand {
        PriorityBand::from_score(self.score)
    }
}

/// Scores tasks against a fixed set of weights.
#[derive(Debug, Clone, Default)]
pub struct TaskScorer {
    weights: ScoringWeights,
}

impl TaskScorer {
    /// Create a scorer with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom weights.
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a task relative to `today`.
    ///
    /// `counts` must be the fan-in map of the whole batch the task belongs to.
    pub fn score_on(&self, task: &Task, counts: &DependencyCounts, today: NaiveDate) -> ScoreResult {
        let factors = NormalizedFactors::for_task(task, counts, today);
        ScoreResult {
            id: task.id.clone(),
            score: self.combine(&factors),
            explanation: factors.into(),
        }
    }

    /// Score a task relative to the local calendar date.
    pub fn score(&self, task: &Task, counts: &DependencyCounts) -> ScoreResult {
        self.score_on(task, counts, chrono::Local::now().date_naive())
    }

    fn combine(&self, factors: &NormalizedFactors) -> f64 {
        let w = &self.weights;
        let combined = w.importance * factors.importance.value
            + w.urgency * factors.urgency.value
            + w.effort * factors.effort.value
            + w.dependency * factors.dependency.value;

        round2(combined * 100.0).clamp(0.0, 100.0)
    }
}

/// Score a task with default weights relative to the local calendar date.
pub fn score_task(task: &Task, counts: &DependencyCounts) -> ScoreResult {
    TaskScorer::new().score(task, counts)
}

fn percent(value: f64) -> f64 {
    value * 100.0
}

/// Round to two decimals on the exact decimal value, ties to even.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
