pub mod layers;
pub mod schedule_dag;
pub mod topo;

pub use layers::layer_tasks;
pub use schedule_dag::ScheduleDag;
pub use topo::{sort_or_fail, would_create_cycle};
