//! Kahn's algorithm over a [`ScheduleDag`], plus the cycle-prediction query.

use super::schedule_dag::ScheduleDag;
use crate::error::{ScheduleError, ScheduleResult};
use crate::task::{Dependency, Task, TaskId};
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;
use tracing::debug;

impl ScheduleDag {
    /// Returns every node exactly once with each edge's source ahead of its
    /// target. Ties are broken FIFO: sources in input order, then targets in
    /// the order they reach in-degree zero.
    pub fn topological_order(&self) -> ScheduleResult<Vec<NodeIndex>> {
        let mut in_degree = self.in_degrees();
        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| in_degree[ix.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(node_ix) = queue.pop_front() {
            order.push(node_ix);
            for succ_ix in self.successors(node_ix) {
                let degree = &mut in_degree[succ_ix.index()];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ_ix);
                }
            }
        }

        if order.len() < self.len() {
            let blocked: Vec<TaskId> = self
                .graph
                .node_indices()
                .filter(|ix| in_degree[ix.index()] > 0)
                .map(|ix| self.task_id(ix))
                .collect();
            debug!(
                drained = order.len(),
                total = self.len(),
                "topological sort stalled"
            );
            return Err(ScheduleError::CycleDetected { blocked });
        }

        Ok(order)
    }
}

/// Orders task ids so that every dependency's `from` precedes its `to`.
pub fn sort_or_fail(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult<Vec<TaskId>> {
    let dag = ScheduleDag::build(tasks, dependencies)?;
    let order = dag.topological_order()?;
    Ok(order.into_iter().map(|ix| dag.task_id(ix)).collect())
}

/// Reports whether committing `candidate` on top of `dependencies` would close
/// a cycle.
///
/// The check runs on a private overlay graph; the caller's collections are
/// only borrowed. Returns `Ok(true)` for a cycle, `Ok(false)` when the edge is
/// safe, and `Err` for precondition violations such as unknown task ids, which
/// must not be mistaken for a safe answer.
pub fn would_create_cycle(
    tasks: &[Task],
    dependencies: &[Dependency],
    candidate: Dependency,
) -> ScheduleResult<bool> {
    let mut overlay = ScheduleDag::build(tasks, dependencies)?;
    overlay.add_dependency(candidate)?;
    match overlay.topological_order() {
        Ok(_) => Ok(false),
        Err(ScheduleError::CycleDetected { .. }) => {
            debug!(%candidate, "candidate dependency closes a cycle");
            Ok(true)
        }
        Err(err) => Err(err),
    }
}
