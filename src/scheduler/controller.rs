use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cycle::CycleReport;
use crate::engine::InferenceEngine;
use crate::source::FrameSource;

use super::loop_worker::{processing_loop, LoopContext};
use super::state::{LoopSettings, ScheduleConfig, SchedulerStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the processing loop task: spawns it on `start`, signals it via
/// a cancellation token on `stop`, and distributes configuration and
/// instruction changes over a watch channel.
pub struct Scheduler {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    settings_tx: watch::Sender<LoopSettings>,
    reports: mpsc::UnboundedSender<CycleReport>,
}

impl Scheduler {
    pub fn new(reports: mpsc::UnboundedSender<CycleReport>) -> Self {
        let (settings_tx, _) = watch::channel(LoopSettings::default());
        Self {
            handle: None,
            cancel_token: None,
            settings_tx,
            reports,
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        if self.handle.is_some() {
            SchedulerStatus::Running
        } else {
            SchedulerStatus::Idle
        }
    }

    /// Transitions to `Running` and triggers cycle #1 immediately.
    /// Ignored when already running.
    pub fn start(
        &mut self,
        session_id: String,
        source: Arc<FrameSource>,
        engine: Arc<dyn InferenceEngine>,
    ) {
        if self.handle.is_some() {
            log_info!("scheduler already running, start ignored");
            return;
        }

        let cancel_token = CancellationToken::new();
        let ctx = LoopContext {
            session_id,
            source,
            engine,
            settings: self.settings_tx.subscribe(),
            reports: self.reports.clone(),
        };

        let handle = tokio::spawn(processing_loop(ctx, cancel_token.clone()));
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        log_info!("scheduler started");
    }

    /// Requests a cooperative stop and waits for the loop to wind down.
    /// The in-flight cycle (if any) completes and its outcome is still
    /// reported; no cycle starts after it. Safe to call when idle.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("processing loop task failed to join")?;
            log_info!("scheduler stopped");
        }
        Ok(())
    }

    /// Cancels without waiting for the loop to exit. The detached task
    /// finishes its in-flight cycle and then winds down on its own.
    /// Used on drop paths where awaiting is not an option.
    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.handle.take();
    }

    /// Applies from the next not-yet-scheduled cycle; never interrupts
    /// an in-flight cycle or an already-computed wait.
    pub fn reconfigure(&self, config: ScheduleConfig) {
        self.settings_tx.send_modify(|settings| settings.config = config);
    }

    pub fn config(&self) -> ScheduleConfig {
        self.settings_tx.borrow().config
    }

    /// The instruction text submitted with each frame, starting from
    /// the next cycle's capture.
    pub fn set_instruction(&self, instruction: String) {
        self.settings_tx
            .send_modify(|settings| settings.instruction = instruction);
    }
}
