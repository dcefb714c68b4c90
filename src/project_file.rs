//! JSON snapshots of a task store and plan exports for the CLI.

use crate::calendar::{DatedPlan, DatedTask};
use crate::store::{StoreError, TaskStore};
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] StoreError),
}

pub type ProjectFileResult<T> = Result<T, ProjectFileError>;

pub fn save_store_to_json<P: AsRef<Path>>(store: &TaskStore, path: P) -> ProjectFileResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &store.snapshot())?;
    Ok(())
}

/// Loads a snapshot and replays it through the store's validation rules.
pub fn load_store_from_json<P: AsRef<Path>>(path: P) -> ProjectFileResult<TaskStore> {
    let file = File::open(path)?;
    let snapshot = serde_json::from_reader(file)?;
    Ok(TaskStore::from_snapshot(snapshot)?)
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &DatedPlan, path: P) -> ProjectFileResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, plan)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCsvRecord {
    pub id: TaskId,
    pub title: String,
    pub duration_days: u32,
    pub earliest_start: String,
    pub earliest_finish: String,
    pub latest_start: String,
    pub latest_finish: String,
    pub slack_days: i64,
    pub is_critical: bool,
}

impl From<&DatedTask> for PlanCsvRecord {
    fn from(task: &DatedTask) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            duration_days: task.duration_days,
            earliest_start: task.earliest_start_date.to_string(),
            earliest_finish: task.earliest_finish_date.to_string(),
            latest_start: task.latest_start_date.to_string(),
            latest_finish: task.latest_finish_date.to_string(),
            slack_days: task.slack_days,
            is_critical: task.is_critical,
        }
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &DatedPlan, path: P) -> ProjectFileResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for task in &plan.tasks {
        writer.serialize(PlanCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}
