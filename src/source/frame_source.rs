use std::sync::{Arc, Mutex};

use crate::frame::Frame;

use super::{AcquireError, DeviceLayer, DeviceStream, Orientation};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns at most one active capture stream for a session.
///
/// Acquire, release, switch and grab are mutually exclusive; the mutex
/// is held only for the duration of the call, and `grab` never blocks
/// on frame production.
pub struct FrameSource {
    layer: Arc<dyn DeviceLayer>,
    stream: Mutex<Option<Box<dyn DeviceStream>>>,
}

impl FrameSource {
    pub fn new(layer: Arc<dyn DeviceLayer>) -> Self {
        Self {
            layer,
            stream: Mutex::new(None),
        }
    }

    /// Requests exclusive access to a device for the given orientation.
    /// Any previously held stream is stopped first; on failure the
    /// source is left unacquired.
    pub fn acquire(&self, orientation: Orientation) -> Result<(), AcquireError> {
        let mut guard = self.stream.lock().unwrap();
        if let Some(mut old) = guard.take() {
            old.stop();
        }
        let stream = self.layer.request_device(orientation)?;
        *guard = Some(stream);
        log_info!("capture device acquired ({orientation:?})");
        Ok(())
    }

    /// Stops frame production and releases the device. Idempotent and
    /// safe to call when nothing was acquired.
    pub fn release(&self) {
        if let Some(mut stream) = self.stream.lock().unwrap().take() {
            stream.stop();
            log_info!("capture device released");
        }
    }

    /// Releases the current device (if any) and re-acquires with the
    /// new orientation. On failure the source stays unacquired and the
    /// session is camera-less until retried.
    pub fn switch(&self, orientation: Orientation) -> Result<(), AcquireError> {
        self.acquire(orientation)
    }

    /// Point-in-time copy of the most recent frame, or `None` when no
    /// device is acquired or the device is still warming up.
    pub fn grab(&self) -> Option<Frame> {
        self.stream.lock().unwrap().as_ref()?.latest_frame()
    }

    pub fn is_acquired(&self) -> bool {
        self.stream.lock().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use image::RgbaImage;

    use super::*;

    struct FakeStream {
        live: Arc<AtomicUsize>,
        has_frame: bool,
    }

    impl DeviceStream for FakeStream {
        fn latest_frame(&self) -> Option<Frame> {
            self.has_frame.then(|| Frame::new(RgbaImage::new(2, 2)))
        }

        fn stop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    struct FakeLayer {
        live: Arc<AtomicUsize>,
        fail_with: Option<AcquireError>,
        has_frame: bool,
    }

    impl DeviceLayer for FakeLayer {
        fn request_device(
            &self,
            _orientation: Orientation,
        ) -> Result<Box<dyn DeviceStream>, AcquireError> {
            if let Some(err) = self.fail_with {
                return Err(err);
            }
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                live: Arc::clone(&self.live),
                has_frame: self.has_frame,
            }))
        }
    }

    fn source(fail_with: Option<AcquireError>, has_frame: bool) -> (FrameSource, Arc<AtomicUsize>) {
        let live = Arc::new(AtomicUsize::new(0));
        let layer = FakeLayer {
            live: Arc::clone(&live),
            fail_with,
            has_frame,
        };
        (FrameSource::new(Arc::new(layer)), live)
    }

    #[test]
    fn grab_returns_none_when_unacquired() {
        let (source, _) = source(None, true);
        assert!(source.grab().is_none());
        assert!(!source.is_acquired());
    }

    #[test]
    fn acquire_then_grab_and_release() {
        let (source, live) = source(None, true);
        source.acquire(Orientation::Front).unwrap();
        assert!(source.grab().is_some());
        assert_eq!(live.load(Ordering::SeqCst), 1);

        source.release();
        assert!(source.grab().is_none());
        assert_eq!(live.load(Ordering::SeqCst), 0);

        // release is idempotent
        source.release();
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reacquire_stops_previous_stream() {
        let (source, live) = source(None, true);
        source.acquire(Orientation::Front).unwrap();
        source.switch(Orientation::Back).unwrap();
        assert_eq!(live.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_acquire_leaves_source_unacquired() {
        let (source, live) = source(Some(AcquireError::PermissionDenied), true);
        assert_eq!(
            source.acquire(Orientation::Front),
            Err(AcquireError::PermissionDenied)
        );
        assert!(!source.is_acquired());
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn warming_up_stream_grabs_none() {
        let (source, _) = source(None, false);
        source.acquire(Orientation::Front).unwrap();
        assert!(source.grab().is_none());
        assert!(source.is_acquired());
    }
}
