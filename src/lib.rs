//! Continuous live-frame inference core: samples frames from an
//! exclusive capture device, submits each with the current instruction
//! to an inference engine, and reports every outcome, while start,
//! stop, device switches and cadence changes arrive at any time.
//!
//! Cycles are strictly serialized (never two inference calls in flight
//! per session) and the effective period between cycle starts never
//! drops below the configured minimum interval; a slow engine shortens
//! or eliminates the inter-cycle wait instead of compounding delay.

mod cycle;
mod engine;
mod frame;
mod scheduler;
mod session;
mod source;
mod utils;

pub use cycle::{CycleOutcome, CycleReport, SkipReason};
pub use engine::{InferError, InferenceEngine};
pub use frame::Frame;
pub use scheduler::{ScheduleConfig, Scheduler, SchedulerStatus};
pub use session::{SessionController, SessionStatus};
pub use source::{AcquireError, DeviceLayer, DeviceStream, FrameSource, Orientation};

/// Initialize logging (reads RUST_LOG env var, Info by default).
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
