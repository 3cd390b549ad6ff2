//! Batch ranking: cycle check, fan-in, scoring, and ordering.

use chrono::NaiveDate;
use taskrank_core::{Task, TaskId};
use tracing::{debug, info};

use crate::graph;
use crate::scorer::{ScoreResult, TaskScorer};

/// A task together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask {
    pub task: Task,
    pub result: ScoreResult,
}

impl RankedTask {
    pub fn score(&self) -> f64 {
        self.result.score
    }
}

/// Outcome of ranking one batch.
#[derive(Debug, Clone)]
pub struct Ranking {
    cycle: Option<Vec<TaskId>>,
    entries: Vec<RankedTask>,
}

impl Ranking {
    pub fn cycle_detected(&self) -> bool {
        self.cycle.is_some()
    }

    /// Ids along the first cycle found.
    pub fn cycle(&self) -> Option<&[TaskId]> {
        self.cycle.as_deref()
    }

    /// Tasks by descending score; ties keep submission order.
    pub fn entries(&self) -> &[RankedTask] {
        &self.entries
    }

    /// The `n` highest-scoring tasks.
    pub fn top(&self, n: usize) -> &[RankedTask] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank a batch of tasks relative to `today`.
///
/// The fan-in map is built once for the whole batch before any task is
/// scored, and stays read-only while scoring.
pub fn rank_tasks(tasks: Vec<Task>, scorer: &TaskScorer, today: NaiveDate) -> Ranking {
    let cycle = graph::find_cycle(&tasks);
    let counts = graph::compute_dependency_counts(&tasks);

    let mut entries: Vec<RankedTask> = tasks
        .into_iter()
        .map(|task| {
            let result = scorer.score_on(&task, &counts, today);
            debug!(task_id = %task.id, score = result.score, "task scored");
            RankedTask { task, result }
        })
        .collect();

    entries.sort_by(|a, b| b.score().total_cmp(&a.score()));

    info!(
        tasks = entries.len(),
        cycle_detected = cycle.is_some(),
        top_score = entries.first().map(RankedTask::score),
        "batch ranked"
    );

    Ranking { cycle, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let tasks = vec![
            Task::new(0i64).with_title("low").with_importance(1i64).with_estimated_hours(30i64),
            Task::new(1i64).with_title("high").with_importance(9i64).with_due_date(today()),
            Task::new(2i64).with_title("mid").with_importance(5i64),
        ];

        let ranking = rank_tasks(tasks, &TaskScorer::new(), today());
        let order: Vec<&str> = ranking.entries().iter().map(|e| e.task.display_title()).collect();

        assert_eq!(order, vec!["high", "mid", "low"]);
        assert!(!ranking.cycle_detected());
        assert_eq!(ranking.cycle(), None);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let tasks = vec![Task::new("a"), Task::new("b"), Task::new("c")];
        let ranking = rank_tasks(tasks, &TaskScorer::new(), today());
        let ids: Vec<String> = ranking.entries().iter().map(|e| e.task.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_reported_and_tasks_still_scored() {
        let tasks = vec![
            Task::new(1i64).with_dependencies([2i64]),
            Task::new(2i64).with_dependencies([1i64]),
        ];
        let ranking = rank_tasks(tasks, &TaskScorer::new(), today());

        assert!(ranking.cycle_detected());
        assert_eq!(ranking.cycle().map(<[TaskId]>::len), Some(2));
        assert_eq!(ranking.len(), 2);
        // each has fan-in 1 in a batch of 2
        assert!(ranking.entries().iter().all(|e| e.score() == 22.5));
    }

    #[test]
    fn test_top_is_bounded_by_batch() {
        let tasks: Vec<Task> = (0..5i64)
            .map(|i| Task::new(i).with_importance(i).with_due_date(today() + Duration::days(i)))
            .collect();
        let ranking = rank_tasks(tasks, &TaskScorer::new(), today());

        let top: Vec<TaskId> = ranking.top(3).iter().map(|e| e.task.id.clone()).collect();
        assert_eq!(top, vec![TaskId::Int(4), TaskId::Int(3), TaskId::Int(2)]);
        assert_eq!(ranking.top(10).len(), 5);
        assert!(rank_tasks(Vec::new(), &TaskScorer::new(), today()).top(3).is_empty());
    }
}
