use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::engine::{InferError, InferenceEngine};
use crate::source::FrameSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Why a cycle produced no inference result. Expected transient
/// conditions; the loop continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    FrameUnavailable,
    EngineNotReady,
}

/// Result of one capture + inference unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CycleOutcome {
    Success { text: String },
    Failure { reason: String },
    Skipped { reason: SkipReason },
}

/// One cycle's outcome as delivered to the report channel. Transient;
/// nothing is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub session_id: String,
    /// 1-based position within the current scheduler run.
    pub sequence: u64,
    pub outcome: CycleOutcome,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Runs exactly one capture -> infer -> report cycle. Holds no state
/// across invocations; the elapsed duration is returned alongside the
/// report for the scheduler's delay computation.
pub(crate) async fn run_cycle(
    source: &FrameSource,
    engine: &Arc<dyn InferenceEngine>,
    instruction: &str,
    session_id: &str,
    sequence: u64,
) -> (CycleReport, Duration) {
    let started = Instant::now();
    let timestamp = Utc::now();

    let Some(frame) = source.grab() else {
        log_info!("cycle {sequence}: no frame available, skipping");
        return finish(
            session_id,
            sequence,
            CycleOutcome::Skipped {
                reason: SkipReason::FrameUnavailable,
            },
            started,
            timestamp,
        );
    };

    let (width, height) = frame.dimensions();
    let grab_ms = started.elapsed().as_millis();

    let outcome = match engine.infer(&frame, instruction).await {
        Ok(text) => CycleOutcome::Success { text },
        Err(InferError::NotReady) => {
            log_info!("cycle {sequence}: engine not ready, skipping");
            CycleOutcome::Skipped {
                reason: SkipReason::EngineNotReady,
            }
        }
        Err(InferError::Engine(reason)) => {
            log_warn!("cycle {sequence}: inference failed: {reason}");
            CycleOutcome::Failure { reason }
        }
    };

    let (report, elapsed) = finish(session_id, sequence, outcome, started, timestamp);
    log_info!(
        "cycle {} completed in {}ms ({}x{} frame, grab: {}ms)",
        sequence,
        report.elapsed_ms,
        width,
        height,
        grab_ms
    );
    (report, elapsed)
}

fn finish(
    session_id: &str,
    sequence: u64,
    outcome: CycleOutcome,
    started: Instant,
    timestamp: DateTime<Utc>,
) -> (CycleReport, Duration) {
    let elapsed = started.elapsed();
    let report = CycleReport {
        session_id: session_id.to_string(),
        sequence,
        outcome,
        elapsed_ms: elapsed.as_millis() as u64,
        timestamp,
    };
    (report, elapsed)
}
