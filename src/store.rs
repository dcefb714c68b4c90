//! In-memory task store feeding the scheduling engine.
//!
//! The store owns task records and the committed dependency set. Every
//! mutation that needs a cycle check performs the check and the insert under
//! the same `&mut self` borrow; callers sharing a store across threads wrap it
//! in a lock and hold the write guard for the whole call.

use crate::calendar::{self, DateOutOfRange, DatedPlan};
use crate::error::ScheduleError;
use crate::graph;
use crate::schedule::{self, ProjectSchedule};
use crate::task::{Dependency, Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_DURATION_DAYS: u32 = 1;
/// Ten thousand Gregorian years.
pub const MAX_DURATION_DAYS: u32 = 3_652_425;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("title is required")]
    EmptyTitle,
    #[error("duration of {requested} days exceeds the limit of {max} days")]
    DurationTooLarge { requested: i64, max: u32 },
    #[error("no task ids left to assign")]
    IdSpaceExhausted,
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("a task cannot depend on itself (task {0})")]
    SelfDependency(TaskId),
    #[error("dependency {0} already exists")]
    DuplicateDependency(Dependency),
    #[error("dependency {0} not found")]
    DependencyNotFound(Dependency),
    #[error("dependency {0} would create a cycle")]
    WouldCreateCycle(Dependency),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    DateOutOfRange(#[from] DateOutOfRange),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: TaskId,
    pub title: String,
    pub duration_days: u32,
    pub created_at: DateTime<Utc>,
}

impl StoredTask {
    pub fn to_task(&self) -> Task {
        Task::new(self.id, self.title.clone(), self.duration_days)
    }
}

/// Serializable image of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub tasks: Vec<StoredTask>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<StoredTask>,
    dependencies: Vec<Dependency>,
    /// `None` once `TaskId::MAX` has been handed out.
    next_id: Option<TaskId>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Missing durations default to one day; negative input clamps to zero.
pub fn normalize_duration(duration_days: Option<i64>) -> StoreResult<u32> {
    let days = match duration_days {
        None => return Ok(DEFAULT_DURATION_DAYS),
        Some(days) => days.max(0),
    };
    u32::try_from(days)
        .ok()
        .filter(|&days| days <= MAX_DURATION_DAYS)
        .ok_or(StoreError::DurationTooLarge {
            requested: days,
            max: MAX_DURATION_DAYS,
        })
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            dependencies: Vec::new(),
            next_id: Some(1),
        }
    }

    pub fn create_task(
        &mut self,
        title: &str,
        duration_days: Option<i64>,
    ) -> StoreResult<StoredTask> {
        self.create_task_at(title, duration_days, Utc::now())
    }

    pub fn create_task_at(
        &mut self,
        title: &str,
        duration_days: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> StoreResult<StoredTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let duration_days = normalize_duration(duration_days)?;
        let id = self.next_id.ok_or(StoreError::IdSpaceExhausted)?;
        let task = StoredTask {
            id,
            title: title.to_string(),
            duration_days,
            created_at,
        };
        self.next_id = id.checked_add(1);
        self.tasks.push(task.clone());
        info!(task_id = task.id, duration_days = task.duration_days, "task created");
        Ok(task)
    }

    pub fn list_tasks(&self) -> &[StoredTask] {
        &self.tasks
    }

    pub fn task(&self, task_id: TaskId) -> Option<&StoredTask> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.task(task_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes the task together with every dependency touching it.
    pub fn delete_task(&mut self, task_id: TaskId) -> StoreResult<StoredTask> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;
        let removed = self.tasks.remove(position);
        let before = self.dependencies.len();
        self.dependencies
            .retain(|dep| dep.from != task_id && dep.to != task_id);
        info!(
            task_id,
            dropped_dependencies = before - self.dependencies.len(),
            "task deleted"
        );
        Ok(removed)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn add_dependency(&mut self, from: TaskId, to: TaskId) -> StoreResult<Dependency> {
        let candidate = Dependency::new(from, to);
        if candidate.is_self_loop() {
            return Err(StoreError::SelfDependency(from));
        }
        self.ensure_known(candidate)?;
        if self.dependencies.contains(&candidate) {
            return Err(StoreError::DuplicateDependency(candidate));
        }
        if graph::would_create_cycle(&self.nodes(), &self.dependencies, candidate)? {
            warn!(%candidate, "rejected dependency that would create a cycle");
            return Err(StoreError::WouldCreateCycle(candidate));
        }
        self.dependencies.push(candidate);
        info!(%candidate, "dependency added");
        Ok(candidate)
    }

    pub fn remove_dependency(&mut self, from: TaskId, to: TaskId) -> StoreResult<Dependency> {
        let target = Dependency::new(from, to);
        let position = self
            .dependencies
            .iter()
            .position(|dep| *dep == target)
            .ok_or(StoreError::DependencyNotFound(target))?;
        let removed = self.dependencies.remove(position);
        info!(dependency = %removed, "dependency removed");
        Ok(removed)
    }

    /// Would `from -> to` close a cycle against the committed graph?
    pub fn check_dependency(&self, from: TaskId, to: TaskId) -> StoreResult<bool> {
        let candidate = Dependency::new(from, to);
        self.ensure_known(candidate)?;
        Ok(graph::would_create_cycle(
            &self.nodes(),
            &self.dependencies,
            candidate,
        )?)
    }

    fn ensure_known(&self, dependency: Dependency) -> StoreResult<()> {
        for task_id in [dependency.from, dependency.to] {
            if !self.contains(task_id) {
                return Err(StoreError::TaskNotFound(task_id));
            }
        }
        Ok(())
    }

    /// Engine input, ordered by ascending id.
    pub fn nodes(&self) -> Vec<Task> {
        let mut nodes: Vec<Task> = self.tasks.iter().map(StoredTask::to_task).collect();
        nodes.sort_by_key(|task| task.id);
        nodes
    }

    pub fn execution_order(&self) -> StoreResult<Vec<TaskId>> {
        Ok(graph::sort_or_fail(&self.nodes(), &self.dependencies)?)
    }

    pub fn layers(&self) -> StoreResult<Vec<Vec<TaskId>>> {
        Ok(graph::layer_tasks(&self.nodes(), &self.dependencies)?)
    }

    pub fn schedule(&self) -> StoreResult<ProjectSchedule> {
        Ok(schedule::schedule(&self.nodes(), &self.dependencies)?)
    }

    /// Earliest creation day, or today for an empty store.
    pub fn default_project_start(&self) -> NaiveDate {
        calendar::project_start_from(self.tasks.iter().map(|task| task.created_at))
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn plan(&self, anchor: Option<NaiveDate>) -> StoreResult<DatedPlan> {
        let schedule = self.schedule()?;
        let start = anchor.unwrap_or_else(|| self.default_project_start());
        Ok(DatedPlan::new(&schedule, &self.dependencies, start)?)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.tasks.clone(),
            dependencies: self.dependencies.clone(),
        }
    }

    /// Rebuilds a store, applying the same rules as the live mutations.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> StoreResult<Self> {
        let mut seen = HashSet::with_capacity(snapshot.tasks.len());
        for task in &snapshot.tasks {
            if task.title.trim().is_empty() {
                return Err(StoreError::EmptyTitle);
            }
            normalize_duration(Some(i64::from(task.duration_days)))?;
            if !seen.insert(task.id) {
                return Err(ScheduleError::DuplicateTaskId(task.id).into());
            }
        }

        let mut tasks = snapshot.tasks;
        tasks.sort_by_key(|task| task.id);
        let mut store = Self {
            next_id: tasks.last().map_or(Some(1), |task| task.id.max(0).checked_add(1)),
            tasks,
            dependencies: Vec::with_capacity(snapshot.dependencies.len()),
        };
        for dep in snapshot.dependencies {
            store.add_dependency(dep.from, dep.to)?;
        }
        Ok(store)
    }
}
