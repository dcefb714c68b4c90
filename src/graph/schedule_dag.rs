use crate::error::{ScheduleError, ScheduleResult};
use crate::task::{Dependency, Task, TaskId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Dense-index view of a task graph.
///
/// Node indices follow the caller's task order, so `NodeIndex::index()` can be
/// used directly to address per-task arrays in the forward and backward
/// passes. Parallel edges are kept: duplicated dependencies stay in the edge
/// list and count once each toward in-degree.
pub struct ScheduleDag {
    pub graph: DiGraph<TaskId, ()>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    pub durations: Vec<i64>,
}

impl ScheduleDag {
    pub fn build(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult<Self> {
        let mut graph: DiGraph<TaskId, ()> =
            DiGraph::with_capacity(tasks.len(), dependencies.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());
        let mut durations: Vec<i64> = Vec::with_capacity(tasks.len());

        // Add nodes first
        for task in tasks {
            if id_to_index.contains_key(&task.id) {
                return Err(ScheduleError::DuplicateTaskId(task.id));
            }
            let node_ix = graph.add_node(task.id);
            id_to_index.insert(task.id, node_ix);
            durations.push(i64::from(task.duration_days));
        }

        let mut dag = Self {
            graph,
            id_to_index,
            durations,
        };

        // Add edges: from -> to
        for dependency in dependencies {
            dag.add_dependency(*dependency)?;
        }

        Ok(dag)
    }

    pub fn add_dependency(&mut self, dependency: Dependency) -> ScheduleResult<()> {
        let from = self.index_of(dependency, dependency.from)?;
        let to = self.index_of(dependency, dependency.to)?;
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    fn index_of(&self, dependency: Dependency, task_id: TaskId) -> ScheduleResult<NodeIndex> {
        self.id_to_index
            .get(&task_id)
            .copied()
            .ok_or(ScheduleError::UnknownTaskReference {
                from: dependency.from,
                to: dependency.to,
                missing: task_id,
            })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn task_id(&self, node_ix: NodeIndex) -> TaskId {
        self.graph[node_ix]
    }

    pub fn duration(&self, node_ix: NodeIndex) -> i64 {
        self.durations[node_ix.index()]
    }

    /// Incoming edge count per node, parallel edges included.
    pub fn in_degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|ix| self.graph.edges_directed(ix, Direction::Incoming).count())
            .collect()
    }

    /// Direct successors in the order their edges were added, one entry per edge.
    pub fn successors(&self, node_ix: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists the most recently added edge first.
        let mut targets: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node_ix, Direction::Outgoing)
            .collect();
        targets.reverse();
        targets
    }

    pub fn predecessors(&self, node_ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node_ix, Direction::Incoming)
    }

    pub fn has_predecessors(&self, node_ix: NodeIndex) -> bool {
        self.predecessors(node_ix).next().is_some()
    }
}
