//! Capture seams for the cognitive overload monitor.
//!
//! Frame capture and facial landmark extraction are external collaborators
//! with narrow contracts: the session core only needs a blocking frame
//! source and a per-frame landmark lookup. Synthetic implementations are
//! provided so the crate builds and runs on machines without a camera.

pub mod synthetic;
pub mod types;

// Re-export commonly used types
pub use synthetic::{neutral_face, NoFace, StaticFace, SyntheticCapture};
pub use types::{Frame, LandmarkSet, MIN_LANDMARKS};

/// Errors raised by capture devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The device could not be acquired. Fatal to session creation.
    DeviceUnavailable(String),
    /// A frame read failed mid-session. Fatal to the sampling loop.
    ReadFailed(String),
    /// A frame was requested before `open` (or after `close`).
    NotOpen,
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::DeviceUnavailable(e) => write!(f, "capture device unavailable: {e}"),
            CaptureError::ReadFailed(e) => write!(f, "frame read failed: {e}"),
            CaptureError::NotOpen => write!(f, "capture device is not open"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// A blocking frame source, exclusively owned by the active session.
pub trait CaptureDevice: Send {
    /// Acquire the device. Called once per session before the sampling
    /// loop starts; failure aborts session creation.
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Read the next frame, blocking until one is available (bounded by
    /// the hardware frame rate).
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Release the device.
    fn close(&mut self);
}

/// Facial landmark extraction collaborator.
pub trait LandmarkExtractor: Send {
    /// Extract landmarks for the first face in the frame. `None` means no
    /// face was detected, an expected, non-fatal condition.
    fn get_landmarks(&mut self, frame: &Frame) -> Option<LandmarkSet>;
}
