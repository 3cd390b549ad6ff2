//! Response shapes for ranked batches.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use taskrank_core::TaskId;
use taskrank_engine::factors::coerce_number;
use taskrank_engine::{PriorityBand, RankedTask, Ranking};

/// One scored task in an analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTaskRecord {
    pub id: TaskId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Value,
    pub importance: Value,
    pub dependencies: Vec<TaskId>,
    pub score: f64,
    pub priority: PriorityBand,
    pub explanation: String,
}

impl From<&RankedTask> for ScoredTaskRecord {
    fn from(entry: &RankedTask) -> Self {
        let task = &entry.task;
        Self {
            id: task.id.clone(),
            title: task.display_title().to_string(),
            due_date: task.due_date,
            estimated_hours: json_number(coerce_number(&task.estimated_hours)),
            importance: json_number(coerce_number(&task.importance)),
            dependencies: task.dependencies.clone(),
            score: entry.result.score,
            priority: entry.result.band(),
            explanation: entry.result.explanation.to_string(),
        }
    }
}

/// Full analysis of a batch, highest score first.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub circular_dependencies_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<TaskId>>,
    pub tasks: Vec<ScoredTaskRecord>,
}

impl AnalysisReport {
    pub fn from_ranking(ranking: &Ranking) -> Self {
        Self {
            circular_dependencies_detected: ranking.cycle_detected(),
            cycle: ranking.cycle().map(<[TaskId]>::to_vec),
            tasks: ranking.entries().iter().map(ScoredTaskRecord::from).collect(),
        }
    }
}

/// A suggested next task.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: TaskId,
    pub title: String,
    pub score: f64,
    pub explanation: String,
}

/// The highest-scoring tasks of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub top_3: Vec<Suggestion>,
}

impl SuggestionReport {
    pub fn from_ranking(ranking: &Ranking, limit: usize) -> Self {
        let top_3 = ranking
            .top(limit)
            .iter()
            .map(|entry| Suggestion {
                id: entry.task.id.clone(),
                title: entry.task.display_title().to_string(),
                score: entry.result.score,
                explanation: entry.result.explanation.to_string(),
            })
            .collect();
        Self { top_3 }
    }
}

/// Whole numbers render without a fractional part.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
