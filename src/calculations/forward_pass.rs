use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;

/// Earliest start/finish offsets, indexed by `NodeIndex::index()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyTimes {
    pub early_starts: Vec<i64>,
    pub early_finishes: Vec<i64>,
}

impl EarlyTimes {
    /// Latest early finish over all tasks; zero for an empty graph.
    pub fn project_duration(&self) -> i64 {
        self.early_finishes.iter().copied().max().unwrap_or(0)
    }
}

pub struct ForwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// `order` must be a topological order of the whole graph so that every
    /// predecessor's finish is final before it is read.
    pub fn execute(&self, order: &[NodeIndex]) -> EarlyTimes {
        let mut early_starts = vec![0i64; self.dag.len()];
        let mut early_finishes = vec![0i64; self.dag.len()];

        for &node_ix in order {
            // Early start is max of all predecessor finishes
            let early_start = self
                .dag
                .predecessors(node_ix)
                .map(|pred_ix| early_finishes[pred_ix.index()])
                .max()
                .unwrap_or(0);
            early_starts[node_ix.index()] = early_start;
            early_finishes[node_ix.index()] = early_start + self.dag.duration(node_ix);
        }

        EarlyTimes {
            early_starts,
            early_finishes,
        }
    }
}
