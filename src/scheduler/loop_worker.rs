use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::cycle::{run_cycle, CycleReport};
use crate::engine::InferenceEngine;
use crate::source::FrameSource;

use super::state::LoopSettings;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

pub(crate) struct LoopContext {
    pub session_id: String,
    pub source: Arc<FrameSource>,
    pub engine: Arc<dyn InferenceEngine>,
    pub settings: watch::Receiver<LoopSettings>,
    pub reports: mpsc::UnboundedSender<CycleReport>,
}

/// The `Running` body of the scheduler: strictly serialized cycles with
/// an adaptive inter-cycle wait. Cancellation is consulted between
/// cycles and during the wait, never mid-cycle, so an in-flight
/// inference call always runs to completion.
pub(crate) async fn processing_loop(ctx: LoopContext, cancel_token: CancellationToken) {
    let mut sequence: u64 = 0;

    loop {
        if cancel_token.is_cancelled() {
            break;
        }

        sequence += 1;
        let instruction = ctx.settings.borrow().instruction.clone();
        let (report, elapsed) =
            run_cycle(&ctx.source, &ctx.engine, &instruction, &ctx.session_id, sequence).await;

        // The observer may be gone; a closed receiver never halts the loop.
        let _ = ctx.reports.send(report);

        if cancel_token.is_cancelled() {
            log_info!("processing loop stopping after cycle {sequence}");
            break;
        }

        // Config snapshot taken now; a reconfigure arriving later only
        // affects the delay computed after the next outcome.
        let delay = ctx.settings.borrow().config.remaining_delay(elapsed);
        if delay.is_zero() {
            // The engine is already the bottleneck; start the next
            // cycle immediately but stay cooperative.
            tokio::task::yield_now().await;
            continue;
        }

        tokio::select! {
            _ = sleep(delay) => {}
            _ = cancel_token.cancelled() => {
                log_info!("processing loop stopping during inter-cycle wait");
                break;
            }
        }
    }
}
