use super::schedule_dag::ScheduleDag;
use crate::error::ScheduleResult;
use crate::task::{Dependency, Task, TaskId};
use petgraph::graph::NodeIndex;

impl ScheduleDag {
    /// Breadth-first columns for left-to-right rendering.
    ///
    /// The first layer holds every task without predecessors in input order;
    /// each later layer holds the tasks first reached from the previous one.
    /// Tasks only reachable through a cycle never appear.
    pub fn layers(&self) -> Vec<Vec<NodeIndex>> {
        let mut seen = vec![false; self.len()];
        let mut frontier: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&ix| !self.has_predecessors(ix))
            .collect();
        for ix in &frontier {
            seen[ix.index()] = true;
        }

        let mut layers = Vec::new();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &node_ix in &frontier {
                for succ_ix in self.successors(node_ix) {
                    if !seen[succ_ix.index()] {
                        seen[succ_ix.index()] = true;
                        next.push(succ_ix);
                    }
                }
            }
            layers.push(frontier);
            frontier = next;
        }
        layers
    }
}

pub fn layer_tasks(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult<Vec<Vec<TaskId>>> {
    let dag = ScheduleDag::build(tasks, dependencies)?;
    Ok(dag
        .layers()
        .into_iter()
        .map(|layer| layer.into_iter().map(|ix| dag.task_id(ix)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(ids: &[TaskId]) -> Vec<Task> {
        ids.iter().map(|&id| Task::new(id, format!("T{id}"), 1)).collect()
    }

    #[test]
    fn diamond_has_three_layers() {
        let deps = [
            Dependency::new(1, 2),
            Dependency::new(1, 3),
            Dependency::new(2, 4),
            Dependency::new(3, 4),
        ];
        let layers = layer_tasks(&tasks(&[1, 2, 3, 4]), &deps).unwrap();
        assert_eq!(layers, vec![vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn task_is_placed_where_first_discovered() {
        // 1 -> 2 -> 3 and 1 -> 3: task 3 is reached directly from layer 0.
        let deps = [
            Dependency::new(1, 2),
            Dependency::new(2, 3),
            Dependency::new(1, 3),
        ];
        let layers = layer_tasks(&tasks(&[1, 2, 3]), &deps).unwrap();
        assert_eq!(layers, vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn isolated_tasks_share_the_first_layer() {
        let layers = layer_tasks(&tasks(&[5, 6]), &[]).unwrap();
        assert_eq!(layers, vec![vec![5, 6]]);
    }

    #[test]
    fn empty_graph_has_no_layers() {
        assert!(layer_tasks(&[], &[]).unwrap().is_empty());
    }
}
