//! Synthetic capture implementations.
//!
//! These exist so the crate (and binary) can run on machines without a
//! camera or landmark model: the synthetic device emits paced blank
//! frames, and the landmark extractors replay fixed point sets. They also
//! back the demo and the integration tests.

use std::thread;
use std::time::Duration;

use crate::capture::types::{Frame, LandmarkSet, MIN_LANDMARKS};
use crate::capture::{CaptureDevice, CaptureError, LandmarkExtractor};

/// A capture device that produces blank frames at a fixed pace.
///
/// `read_frame` sleeps for the configured interval to emulate a blocking
/// hardware read, keeping loop latency characteristics realistic.
pub struct SyntheticCapture {
    frame_interval: Duration,
    open: bool,
    frames_read: u64,
    fail_after: Option<u64>,
    unavailable: bool,
}

impl SyntheticCapture {
    /// Create a device emitting one frame per `frame_interval`.
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            open: false,
            frames_read: 0,
            fail_after: None,
            unavailable: false,
        }
    }

    /// Make `read_frame` fail after the given number of successful reads.
    pub fn with_failure_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Create a device whose `open` always fails, emulating missing
    /// hardware.
    pub fn unavailable() -> Self {
        let mut device = Self::new(Duration::from_millis(33));
        device.unavailable = true;
        device
    }
}

impl CaptureDevice for SyntheticCapture {
    fn open(&mut self) -> Result<(), CaptureError> {
        if self.unavailable {
            return Err(CaptureError::DeviceUnavailable(
                "no synthetic device configured".to_string(),
            ));
        }
        self.open = true;
        self.frames_read = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.open {
            return Err(CaptureError::NotOpen);
        }
        if let Some(limit) = self.fail_after {
            if self.frames_read >= limit {
                return Err(CaptureError::ReadFailed("synthetic fault injected".to_string()));
            }
        }
        thread::sleep(self.frame_interval);
        self.frames_read += 1;
        Ok(Frame::blank(640, 480))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// A landmark extractor that never finds a face.
pub struct NoFace;

impl LandmarkExtractor for NoFace {
    fn get_landmarks(&mut self, _frame: &Frame) -> Option<LandmarkSet> {
        None
    }
}

/// A landmark extractor replaying the same point set for every frame.
pub struct StaticFace {
    landmarks: LandmarkSet,
}

impl StaticFace {
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self { landmarks }
    }

    /// Swap the replayed point set (e.g. to script a blink mid-run).
    pub fn set_landmarks(&mut self, landmarks: LandmarkSet) {
        self.landmarks = landmarks;
    }
}

impl LandmarkExtractor for StaticFace {
    fn get_landmarks(&mut self, _frame: &Frame) -> Option<LandmarkSet> {
        Some(self.landmarks.clone())
    }
}

/// Build a geometrically plausible neutral face: eyes open, mouth closed,
/// gaze centered.
///
/// Only the mesh indices consumed by the signal analyzers carry meaningful
/// coordinates; the rest of the set is padding up to [`MIN_LANDMARKS`].
pub fn neutral_face() -> LandmarkSet {
    let mut set = LandmarkSet::new(vec![[0.0, 0.0, 0.0]; MIN_LANDMARKS + 78]);

    // Left eye: corners 40px apart, lids 10px apart (aspect ratio 0.25).
    set.set(33, [100.0, 100.0, 0.0]); // outer corner
    set.set(133, [140.0, 100.0, 0.0]); // inner corner
    set.set(160, [110.0, 95.0, 0.0]); // upper lid
    set.set(158, [130.0, 95.0, 0.0]); // upper lid
    set.set(144, [110.0, 105.0, 0.0]); // lower lid
    set.set(153, [130.0, 105.0, 0.0]); // lower lid

    // Right eye, mirrored.
    set.set(362, [200.0, 100.0, 0.0]); // inner corner
    set.set(263, [240.0, 100.0, 0.0]); // outer corner
    set.set(385, [210.0, 95.0, 0.0]); // upper lid
    set.set(387, [230.0, 95.0, 0.0]); // upper lid
    set.set(380, [210.0, 105.0, 0.0]); // lower lid
    set.set(373, [230.0, 105.0, 0.0]); // lower lid

    // Mouth: 40px wide, lips 5px apart (aspect ratio 0.125).
    set.set(13, [170.0, 150.0, 0.0]); // top lip
    set.set(14, [170.0, 155.0, 0.0]); // bottom lip
    set.set(78, [150.0, 152.0, 0.0]); // left corner
    set.set(308, [190.0, 152.0, 0.0]); // right corner

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_capture_requires_open() {
        let mut device = SyntheticCapture::new(Duration::from_millis(1));
        assert_eq!(device.read_frame().unwrap_err(), CaptureError::NotOpen);

        device.open().unwrap();
        assert!(device.read_frame().is_ok());

        device.close();
        assert_eq!(device.read_frame().unwrap_err(), CaptureError::NotOpen);
    }

    #[test]
    fn test_unavailable_device_fails_open() {
        let mut device = SyntheticCapture::unavailable();
        assert!(matches!(
            device.open(),
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_fault_injection() {
        let mut device = SyntheticCapture::new(Duration::from_millis(1)).with_failure_after(2);
        device.open().unwrap();
        assert!(device.read_frame().is_ok());
        assert!(device.read_frame().is_ok());
        assert!(matches!(
            device.read_frame(),
            Err(CaptureError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_neutral_face_size() {
        let face = neutral_face();
        assert!(face.len() >= MIN_LANDMARKS);
        assert_eq!(face.get(33), Some([100.0, 100.0, 0.0]));
    }

    #[test]
    fn test_static_face_replays() {
        let mut extractor = StaticFace::new(neutral_face());
        let frame = Frame::blank(640, 480);
        assert_eq!(extractor.get_landmarks(&frame), Some(neutral_face()));
    }

    #[test]
    fn test_no_face_never_detects() {
        let mut extractor = NoFace;
        assert!(extractor.get_landmarks(&Frame::blank(640, 480)).is_none());
    }
}
