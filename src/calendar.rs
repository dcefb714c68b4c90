//! Maps the engine's day offsets onto calendar dates.
//!
//! Plain calendar days only: day `n` is `project_start + n`. The integer
//! schedule is read, never modified.

use crate::schedule::ProjectSchedule;
use crate::task::{Dependency, TaskId};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An offset that lands outside chrono's supported date range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("day {days} after {start} is outside the supported calendar range")]
pub struct DateOutOfRange {
    pub start: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedTask {
    pub id: TaskId,
    pub title: String,
    pub duration_days: u32,
    pub earliest_start_date: NaiveDate,
    pub earliest_finish_date: NaiveDate,
    pub latest_start_date: NaiveDate,
    pub latest_finish_date: NaiveDate,
    pub slack_days: i64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedPlan {
    pub tasks: Vec<DatedTask>,
    pub edges: Vec<Dependency>,
    pub project_duration_days: i64,
    pub project_start_date: NaiveDate,
    pub project_finish_date: NaiveDate,
    #[serde(default)]
    pub critical_path: Vec<TaskId>,
}

impl DatedPlan {
    /// Fails when any offset, or the project finish, falls past the end of
    /// the calendar.
    pub fn new(
        schedule: &ProjectSchedule,
        dependencies: &[Dependency],
        project_start: NaiveDate,
    ) -> Result<Self, DateOutOfRange> {
        let date = |days: i64| offset_date(project_start, days);
        let tasks = schedule
            .tasks
            .iter()
            .map(|entry| -> Result<DatedTask, DateOutOfRange> {
                Ok(DatedTask {
                    id: entry.id,
                    title: entry.title.clone(),
                    duration_days: entry.duration_days,
                    earliest_start_date: date(entry.early_start)?,
                    earliest_finish_date: date(entry.early_finish)?,
                    latest_start_date: date(entry.late_start)?,
                    latest_finish_date: date(entry.late_finish)?,
                    slack_days: entry.slack,
                    is_critical: entry.is_critical,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tasks,
            edges: dependencies.to_vec(),
            project_duration_days: schedule.project_duration_days,
            project_start_date: project_start,
            project_finish_date: date(schedule.project_duration_days)?,
            critical_path: schedule.critical_path.clone(),
        })
    }

    pub fn task(&self, task_id: TaskId) -> Option<&DatedTask> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

pub fn offset_date(project_start: NaiveDate, days: i64) -> Result<NaiveDate, DateOutOfRange> {
    Duration::try_days(days)
        .and_then(|delta| project_start.checked_add_signed(delta))
        .ok_or(DateOutOfRange {
            start: project_start,
            days,
        })
}

/// Earliest timestamp floored to its UTC day, or `None` when there is none.
pub fn project_start_from<I>(created: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    created.into_iter().min().map(|ts| ts.date_naive())
}
