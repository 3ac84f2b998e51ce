mod controller;
mod loop_worker;
mod state;

pub use controller::Scheduler;
pub use state::{ScheduleConfig, SchedulerStatus};
