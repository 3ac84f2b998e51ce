use async_trait::async_trait;

use crate::frame::Frame;

/// Why a single inference call failed. Opaque to the core; retry policy
/// is the scheduler's concern (the natural next-cycle attempt).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferError {
    /// The engine is still loading or warming up. Reported as a skipped
    /// cycle rather than a failure.
    #[error("inference engine is not ready")]
    NotReady,
    /// Opaque engine-internal failure.
    #[error("inference engine failure: {0}")]
    Engine(String),
}

/// Async boundary to the external inference engine.
///
/// `infer` may take arbitrarily long and is never invoked twice
/// concurrently for the same session. Implementations must remain
/// callable after a prior failure and must not retry internally.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn infer(&self, frame: &Frame, instruction: &str) -> Result<String, InferError>;
}
