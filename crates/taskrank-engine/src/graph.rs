//! Dependency graph analysis over a task batch.
//!
//! An edge `task -> dep` means `task` waits on `dep`. The graph is built
//! fresh from each batch and never stored. Dependencies that name ids outside
//! the batch are dead ends: they add no edge and no fan-in.
//!
//! ## Example
//!
//! ```
//! use taskrank_core::Task;
//! use taskrank_engine::graph::{compute_dependency_counts, detect_circular_dependencies};
//!
//! let tasks = vec![
//!     Task::new(0i64),
//!     Task::new(1i64).with_dependencies([0i64]),
//!     Task::new(2i64).with_dependencies([0i64, 1]),
//! ];
//!
//! assert!(!detect_circular_dependencies(&tasks));
//! let counts = compute_dependency_counts(&tasks);
//! assert_eq!(counts.get(&0i64.into()), 2);
//! ```

use std::collections::HashMap;

use taskrank_core::{Task, TaskId};
use tracing::{debug, warn};

/// Traversal state of a node during cycle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Adjacency view of a batch, with nodes stored by position.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Node ids in first-seen order
    ids: Vec<TaskId>,
    /// Outgoing edges per node, restricted to nodes in the batch
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph for a batch.
    ///
    /// When an id appears more than once, the last occurrence's dependency
    /// list defines that node's edges.
    pub fn build(tasks: &[Task]) -> Self {
        let mut index: HashMap<&TaskId, usize> = HashMap::with_capacity(tasks.len());
        let mut ids = Vec::with_capacity(tasks.len());
        let mut targets: Vec<&[TaskId]> = Vec::with_capacity(tasks.len());

        for task in tasks {
            match index.get(&task.id) {
                Some(&node) => targets[node] = &task.dependencies,
                None => {
                    index.insert(&task.id, ids.len());
                    ids.push(task.id.clone());
                    targets.push(&task.dependencies);
                }
            }
        }

        let edges = targets
            .iter()
            .map(|deps| {
                let mut out: Vec<usize> = deps.iter().filter_map(|dep| index.get(dep).copied()).collect();
                out.sort_unstable();
                out.dedup();
                out
            })
            .collect();

        Self { ids, edges }
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of edges between nodes of the batch.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Search for a cycle with an explicit work stack.
    ///
    /// Returns the ids along the cycle, starting at the node that was reached
    /// again while still in progress. A self-dependency yields a one-node path.
    pub fn find_cycle(&self) -> Option<Vec<TaskId>> {
        let mut state = vec![VisitState::Unvisited; self.ids.len()];
        // (node, index of the next edge to follow)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.ids.len() {
            if state[root] != VisitState::Unvisited {
                continue;
            }

            state[root] = VisitState::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next_edge) = *frame;
                match self.edges[node].get(next_edge) {
                    Some(&next) => {
                        frame.1 += 1;
                        match state[next] {
                            VisitState::Unvisited => {
                                state[next] = VisitState::InProgress;
                                stack.push((next, 0));
                            }
                            VisitState::InProgress => return Some(self.path_from(&stack, next)),
                            VisitState::Done => {}
                        }
                    }
                    None => {
                        state[node] = VisitState::Done;
                        stack.pop();
                    }
                }
            }
        }

        None
    }

    /// Ids on the stack from `start` to the top.
    fn path_from(&self, stack: &[(usize, usize)], start: usize) -> Vec<TaskId> {
        let begin = stack.iter().position(|&(node, _)| node == start).unwrap_or(0);
        stack[begin..]
            .iter()
            .map(|&(node, _)| self.ids[node].clone())
            .collect()
    }
}

/// Find a dependency cycle in the batch, if any.
pub fn find_cycle(tasks: &[Task]) -> Option<Vec<TaskId>> {
    let graph = DependencyGraph::build(tasks);
    let cycle = graph.find_cycle();

    match &cycle {
        Some(path) => warn!(
            nodes = graph.len(),
            cycle = %format_cycle(path),
            "circular dependency detected"
        ),
        None => debug!(nodes = graph.len(), edges = graph.edge_count(), "dependency graph is acyclic"),
    }

    cycle
}

/// Returns true if any chain of dependencies loops back on itself.
pub fn detect_circular_dependencies(tasks: &[Task]) -> bool {
    find_cycle(tasks).is_some()
}

/// Render a cycle path as `a -> b -> a`.
pub fn format_cycle(path: &[TaskId]) -> String {
    let mut parts: Vec<String> = path.iter().map(ToString::to_string).collect();
    if let Some(first) = path.first() {
        parts.push(first.to_string());
    }
    parts.join(" -> ")
}

/// Fan-in per task id: how many tasks in the batch list it as a dependency.
///
/// Holds exactly one entry per distinct id in the batch. Its length is the
/// batch size used to normalize dependency impact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCounts {
    counts: HashMap<TaskId, usize>,
}

impl DependencyCounts {
    /// Count direct dependents for every task in the batch.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts: HashMap<TaskId, usize> =
            tasks.iter().map(|task| (task.id.clone(), 0)).collect();

        for task in tasks {
            for dep in &task.dependencies {
                if let Some(count) = counts.get_mut(dep) {
                    *count += 1;
                }
            }
        }

        Self { counts }
    }

    /// Fan-in for an id; 0 when the id is not in the batch.
    pub fn get(&self, id: &TaskId) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.counts.contains_key(id)
    }

    /// Number of entries, i.e. the batch size.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, usize)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }
}

impl FromIterator<(TaskId, usize)> for DependencyCounts {
    fn from_iter<I: IntoIterator<Item = (TaskId, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Compute the fan-in map for a batch.
pub fn compute_dependency_counts(tasks: &[Task]) -> DependencyCounts {
    let counts = DependencyCounts::from_tasks(tasks);
    debug!(tasks = counts.len(), "dependency counts computed");
    counts
}
