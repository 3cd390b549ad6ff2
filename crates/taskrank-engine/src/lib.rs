//! Scoring and dependency analysis engine for TaskRank.
//!
//! The engine ranks a batch of tasks by a composite priority score and flags
//! circular dependency chains among them. Every operation is a pure function
//! of the batch it is given: no state survives between calls, and distinct
//! batches can be analyzed in parallel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │      ranking         │  rank_tasks(batch) -> Ranking
//! └──────────┬───────────┘
//!            │
//!   ┌────────┴─────────┐
//!   ▼                  ▼
//! ┌────────────┐  ┌──────────────┐
//! │   graph    │  │    scorer    │  weights × factors -> 0..100
//! │ cycles,    │  └──────┬───────┘
//! │ fan-in     │         ▼
//! └────────────┘  ┌──────────────┐
//!                 │   factors    │  raw fields -> [0, 1]
//!                 └──────────────┘
//! ```

pub mod factors;
pub mod graph;
pub mod ranking;
pub mod scorer;

pub use graph::{
    DependencyCounts, DependencyGraph, compute_dependency_counts, detect_circular_dependencies,
    find_cycle,
};
pub use ranking::{RankedTask, Ranking, rank_tasks};
pub use scorer::{PriorityBand, ScoreExplanation, ScoreResult, ScoringWeights, TaskScorer, score_task};
