pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod project_file;
pub mod schedule;
pub mod store;
pub mod task;

pub use calendar::{DateOutOfRange, DatedPlan, DatedTask, project_start_from};
pub use config::{ConfigError, ServiceConfig};
pub use error::{ScheduleError, ScheduleResult};
pub use graph::{ScheduleDag, layer_tasks, sort_or_fail, would_create_cycle};
pub use project_file::{
    ProjectFileError, load_store_from_json, save_plan_to_csv, save_plan_to_json,
    save_store_to_json,
};
pub use schedule::{ProjectSchedule, ScheduleSummary, TaskSchedule, schedule};
pub use store::{StoreError, StoreSnapshot, StoredTask, TaskStore};
pub use task::{Dependency, Task, TaskId};
