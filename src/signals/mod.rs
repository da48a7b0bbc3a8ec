//! The behavioral signal producer set.
//!
//! Each producer turns one second's raw input (landmarks, a frame, or
//! drained keystrokes) into a small metric tuple. Producers own their
//! internal smoothing state; only their window-local counters are zeroed
//! between windows. [`SignalBank`] groups them and fuses their outputs
//! into one [`SignalSample`] per dispatched second.

pub mod expression;
pub mod eye;
pub mod gaze;
pub mod keyboard;
pub mod types;
pub mod yawn;

// Re-export commonly used types
pub use expression::{ExpressionClassifier, ExpressionSignal, FixedClassifier, NoopClassifier};
pub use eye::EyeSignal;
pub use gaze::GazeSignal;
pub use keyboard::{ChannelKeystrokes, KeyboardSignal, KeystrokeFeed, KeystrokeSource};
pub use types::{
    empty_expression_counts, Expression, ExpressionCounts, GazeDirection, KeyEvent, KeyKind,
    SignalSample,
};
pub use yawn::YawnSignal;

use chrono::{DateTime, Utc};

use crate::capture::{Frame, LandmarkSet};

/// Errors raised by signal producers. Recoverable per sample: the
/// affected second is skipped and the loop continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The landmark set has fewer points than the analyzers need.
    ShortLandmarkSet { got: usize, need: usize },
    /// The expression classifier failed on this frame.
    Classifier(String),
    /// A keystroke source could not be started.
    Source(String),
}

impl std::fmt::Display for SignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalError::ShortLandmarkSet { got, need } => {
                write!(f, "landmark set too short: {got} points, need {need}")
            }
            SignalError::Classifier(e) => write!(f, "expression classifier error: {e}"),
            SignalError::Source(e) => write!(f, "keystroke source error: {e}"),
        }
    }
}

impl std::error::Error for SignalError {}

/// Distance between two landmark points in the frame plane (z ignored).
pub(crate) fn planar_distance(p: [f64; 3], q: [f64; 3]) -> f64 {
    ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2)).sqrt()
}

/// The full producer set, dispatched sequentially once per second.
///
/// Producers are not fanned out: they may share device-adjacent state, so
/// the sampling thread runs them one after another.
pub struct SignalBank {
    eye: EyeSignal,
    yawn: YawnSignal,
    gaze: GazeSignal,
    expression: ExpressionSignal,
    keyboard: KeyboardSignal,
}

impl SignalBank {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            eye: EyeSignal::new(),
            yawn: YawnSignal::new(),
            gaze: GazeSignal::new(),
            expression: ExpressionSignal::new(),
            keyboard: KeyboardSignal::new(started_at),
        }
    }

    /// Forward one keystroke event to the keyboard producer.
    pub fn record_key(&mut self, event: &KeyEvent) {
        self.keyboard.record(event);
    }

    /// Run every producer for one dispatched second and fuse the outputs.
    ///
    /// Landmark producers run first; any error aborts the sample so the
    /// caller can skip the second.
    pub fn dispatch(
        &mut self,
        now: DateTime<Utc>,
        frame: &Frame,
        landmarks: &LandmarkSet,
        classifier: &mut dyn ExpressionClassifier,
    ) -> Result<SignalSample, SignalError> {
        let (is_blinking, blink_count) = self.eye.analyze(landmarks)?;
        let (is_yawning, yawn_count) = self.yawn.analyze(landmarks)?;
        let gaze = self.gaze.analyze(landmarks)?;
        let (expression, expression_counts) = self.expression.analyze(classifier, frame);
        let keys = self.keyboard.analyze(now);

        Ok(SignalSample {
            at: now,
            is_blinking,
            blink_count,
            is_yawning,
            yawn_count,
            gaze,
            expression,
            expression_counts,
            typing_speed: keys.typing_speed,
            backspace_count: keys.backspace_count,
            error_count: keys.error_count,
        })
    }

    /// Zero the producers' window-local counters after a window close.
    pub fn reset_window_counts(&mut self, now: DateTime<Utc>) {
        self.eye.reset_window_count();
        self.yawn.reset_window_count();
        self.keyboard.reset_window(now);
    }
}
