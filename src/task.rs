use serde::{Deserialize, Serialize};
use std::fmt;

pub type TaskId = i32;

/// A schedulable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub duration_days: u32,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, duration_days: u32) -> Self {
        Self {
            id,
            title: title.into(),
            duration_days,
        }
    }
}

/// Finish-to-start precedence: `from` must finish before `to` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub from: TaskId,
    pub to: TaskId,
}

impl Dependency {
    pub fn new(from: TaskId, to: TaskId) -> Self {
        Self { from, to }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
