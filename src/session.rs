use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::cycle::CycleReport;
use crate::engine::InferenceEngine;
use crate::scheduler::{ScheduleConfig, Scheduler, SchedulerStatus};
use crate::source::{AcquireError, DeviceLayer, FrameSource, Orientation};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub scheduler: SchedulerStatus,
    pub device_bound: bool,
}

/// One logical run: a frame source bound to a scheduler instance.
///
/// Controllers are independent; any number of sessions can coexist,
/// each with its own device binding and loop. Reports carry the
/// session id so multiple sessions may share one report sink.
pub struct SessionController {
    id: String,
    source: Arc<FrameSource>,
    engine: Arc<dyn InferenceEngine>,
    scheduler: Mutex<Scheduler>,
}

impl SessionController {
    pub fn new(
        layer: Arc<dyn DeviceLayer>,
        engine: Arc<dyn InferenceEngine>,
        reports: mpsc::UnboundedSender<CycleReport>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: Arc::new(FrameSource::new(layer)),
            engine,
            scheduler: Mutex::new(Scheduler::new(reports)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Acquires the capture device and leaves the scheduler idle, ready
    /// for `start`. On failure the session stays camera-less until
    /// `begin` or `switch_device` is retried.
    pub fn begin(&self, orientation: Orientation) -> Result<(), AcquireError> {
        self.source.acquire(orientation)?;
        log_info!("session {} bound to {orientation:?} device", self.id);
        Ok(())
    }

    /// Starts continuous processing. No-op when already running.
    pub async fn start(&self) {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.start(self.id.clone(), Arc::clone(&self.source), Arc::clone(&self.engine));
    }

    /// Stops after the in-flight cycle (if any) completes; its outcome
    /// is still reported. Idempotent.
    pub async fn stop(&self) -> Result<()> {
        self.scheduler.lock().await.stop().await
    }

    /// Swaps the device binding without touching the scheduler. While a
    /// new device warms up mid-run, cycles report
    /// `Skipped(FrameUnavailable)` and the loop keeps running.
    pub fn switch_device(&self, orientation: Orientation) -> Result<(), AcquireError> {
        self.source.switch(orientation)
    }

    pub async fn reconfigure(&self, config: ScheduleConfig) {
        self.scheduler.lock().await.reconfigure(config);
    }

    pub async fn config(&self) -> ScheduleConfig {
        self.scheduler.lock().await.config()
    }

    pub async fn set_instruction(&self, instruction: String) {
        self.scheduler.lock().await.set_instruction(instruction);
    }

    pub async fn status(&self) -> SessionStatus {
        SessionStatus {
            scheduler: self.scheduler.lock().await.status(),
            device_bound: self.source.is_acquired(),
        }
    }

    /// Stops the scheduler, then releases the device, unconditionally.
    /// The release runs even when the loop join fails.
    pub async fn teardown(&self) -> Result<()> {
        log_info!("session {} tearing down", self.id);
        let stopped = self.scheduler.lock().await.stop().await;
        self.source.release();
        stopped
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // Last-resort teardown for sessions dropped without an explicit
        // call: cancel the loop and free the exclusive device handle.
        // The detached task finishes its in-flight cycle on its own.
        if let Ok(mut scheduler) = self.scheduler.try_lock() {
            scheduler.cancel();
        }
        self.source.release();
    }
}
