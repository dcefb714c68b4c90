use crate::calculations::{BackwardPass, EarlyTimes, ForwardPass, LateTimes};
use crate::error::ScheduleResult;
use crate::graph::ScheduleDag;
use crate::task::{Dependency, Task, TaskId};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// CPM timing for one task, in whole days from project start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub id: TaskId,
    pub title: String,
    pub duration_days: u32,
    pub early_start: i64,
    pub early_finish: i64,
    pub late_start: i64,
    pub late_finish: i64,
    pub slack: i64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSchedule {
    /// One entry per task, in the order the tasks were supplied.
    pub tasks: Vec<TaskSchedule>,
    pub project_duration_days: i64,
    /// One source-to-sink chain of critical tasks.
    pub critical_path: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<TaskId>,
    pub project_duration_days: i64,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}", self.project_duration_days));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

/// Computes the full CPM schedule from scratch.
///
/// Fails with `CycleDetected` when the graph has no topological order and
/// with `UnknownTaskReference` / `DuplicateTaskId` on malformed input.
pub fn schedule(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult<ProjectSchedule> {
    ProjectSchedule::compute(tasks, dependencies)
}

impl ProjectSchedule {
    pub fn compute(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult<Self> {
        let dag = ScheduleDag::build(tasks, dependencies)?;
        let order = dag.topological_order()?;

        let early = ForwardPass::new(&dag).execute(&order);
        let project_duration_days = early.project_duration();
        let late = BackwardPass::new(&dag).execute(&order, project_duration_days);

        let entries: Vec<TaskSchedule> = tasks
            .iter()
            .zip(dag.graph.node_indices())
            .map(|(task, node_ix)| Self::entry(task, node_ix, &early, &late))
            .collect();

        let critical_path = Self::trace_critical_path(&dag, &entries);
        debug!(
            tasks = entries.len(),
            dependencies = dependencies.len(),
            project_duration_days,
            "schedule computed"
        );

        Ok(Self {
            tasks: entries,
            project_duration_days,
            critical_path,
        })
    }

    fn entry(task: &Task, node_ix: NodeIndex, early: &EarlyTimes, late: &LateTimes) -> TaskSchedule {
        let idx = node_ix.index();
        let early_start = early.early_starts[idx];
        let late_start = late.late_starts[idx];
        let slack = late_start - early_start;
        debug_assert!(slack >= 0, "negative slack {slack} for task {}", task.id);
        TaskSchedule {
            id: task.id,
            title: task.title.clone(),
            duration_days: task.duration_days,
            early_start,
            early_finish: early.early_finishes[idx],
            late_start,
            late_finish: late.late_finishes[idx],
            slack,
            is_critical: slack == 0,
        }
    }

    /// Starts at the first critical task without predecessors and follows, at
    /// each step, the first outgoing edge into a critical task that starts
    /// exactly when the current one finishes. Such an edge exists for every
    /// critical task that is not a sink, so the walk ends at a sink whose
    /// finish equals the project duration.
    fn trace_critical_path(dag: &ScheduleDag, entries: &[TaskSchedule]) -> Vec<TaskId> {
        let start = dag
            .graph
            .node_indices()
            .find(|&ix| entries[ix.index()].is_critical && !dag.has_predecessors(ix));

        let mut path = Vec::new();
        let mut current = start;
        while let Some(node_ix) = current {
            let entry = &entries[node_ix.index()];
            path.push(entry.id);
            current = dag.successors(node_ix).into_iter().find(|succ_ix| {
                let succ = &entries[succ_ix.index()];
                succ.is_critical && succ.early_start == entry.early_finish
            });
        }
        path
    }

    pub fn task(&self, task_id: TaskId) -> Option<&TaskSchedule> {
        self.tasks.iter().find(|entry| entry.id == task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn critical_tasks(&self) -> impl Iterator<Item = &TaskSchedule> {
        self.tasks.iter().filter(|entry| entry.is_critical)
    }

    pub fn critical_ids(&self) -> HashSet<TaskId> {
        self.critical_tasks().map(|entry| entry.id).collect()
    }

    /// A dependency is drawn as critical when both of its endpoints are.
    pub fn is_critical_dependency(&self, dependency: &Dependency) -> bool {
        let critical = |id| self.task(id).is_some_and(|entry| entry.is_critical);
        critical(dependency.from) && critical(dependency.to)
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.tasks.len(),
            critical_count: self.critical_tasks().count(),
            critical_path: self.critical_path.clone(),
            project_duration_days: self.project_duration_days,
        }
    }
}
