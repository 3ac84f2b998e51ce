mod frame_source;

pub use frame_source::FrameSource;

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Logical camera-facing selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Front,
    Back,
}

/// Why exclusive access to a capture device could not be obtained.
///
/// Fatal to the current session until the caller retries `begin` or
/// `switch_device`; never crashes the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcquireError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no capture device available for the requested orientation")]
    DeviceUnavailable,
    #[error("video capture is not supported on this platform")]
    NotSupported,
}

/// Platform device layer consumed by [`FrameSource`].
///
/// Implementations own permission prompts and device enumeration; the
/// core only sees the acquire/stop lifecycle and the latest frame.
pub trait DeviceLayer: Send + Sync {
    /// Requests exclusive access to a capture device matching the
    /// orientation preference. On success the returned stream starts
    /// producing frames into its internal live buffer.
    fn request_device(&self, orientation: Orientation) -> Result<Box<dyn DeviceStream>, AcquireError>;
}

/// An acquired, producing capture stream.
pub trait DeviceStream: Send {
    /// Copy of the most recent frame, or `None` while the device is
    /// still warming up. Must never block.
    fn latest_frame(&self) -> Option<Frame>;

    /// Stops frame production and releases the device.
    fn stop(&mut self);
}
