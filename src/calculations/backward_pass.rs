use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;

/// Latest start/finish offsets, indexed by `NodeIndex::index()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateTimes {
    pub late_starts: Vec<i64>,
    pub late_finishes: Vec<i64>,
}

pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Walks `order` in reverse. Tasks without successors finish at
    /// `project_duration`; every other task finishes by its earliest
    /// successor's late start.
    pub fn execute(&self, order: &[NodeIndex], project_duration: i64) -> LateTimes {
        let mut late_starts = vec![0i64; self.dag.len()];
        let mut late_finishes = vec![0i64; self.dag.len()];

        for &node_ix in order.iter().rev() {
            let late_finish = self
                .dag
                .successors(node_ix)
                .into_iter()
                .map(|succ_ix| late_starts[succ_ix.index()])
                .min()
                .unwrap_or(project_duration);
            late_finishes[node_ix.index()] = late_finish;
            late_starts[node_ix.index()] = late_finish - self.dag.duration(node_ix);
        }

        LateTimes {
            late_starts,
            late_finishes,
        }
    }
}
