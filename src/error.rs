//! Error kinds raised by the scheduling engine.

use crate::task::TaskId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Kahn's algorithm could not drain every task. `blocked` lists the tasks
    /// left with unsatisfied predecessors, in input order.
    #[error("cycle detected among tasks {blocked:?}")]
    CycleDetected { blocked: Vec<TaskId> },

    #[error("dependency {from} -> {to} references unknown task {missing}")]
    UnknownTaskReference {
        from: TaskId,
        to: TaskId,
        missing: TaskId,
    },

    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),
}

impl ScheduleError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, ScheduleError::CycleDetected { .. })
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
