//! Gaze direction estimation from eye-corner asymmetry.
//!
//! Compares the projected width of the two eyes: when the head (and with
//! it the gaze) turns, the near eye appears wider than the far one. Crude
//! but stable, and it needs only the four corner landmarks.

use crate::capture::{LandmarkSet, MIN_LANDMARKS};
use crate::signals::{GazeDirection, SignalError};

const LEFT_EYE_OUTER: usize = 33;
const LEFT_EYE_INNER: usize = 133;
const RIGHT_EYE_INNER: usize = 362;
const RIGHT_EYE_OUTER: usize = 263;

const DEFAULT_RATIO_THRESHOLD: f64 = 0.05;

/// Stateful gaze classifier.
pub struct GazeSignal {
    threshold: f64,
    direction: GazeDirection,
}

impl GazeSignal {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_RATIO_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            direction: GazeDirection::Center,
        }
    }

    /// Classify gaze direction from one frame's landmarks.
    pub fn analyze(&mut self, landmarks: &LandmarkSet) -> Result<GazeDirection, SignalError> {
        if landmarks.len() < MIN_LANDMARKS {
            return Err(SignalError::ShortLandmarkSet {
                got: landmarks.len(),
                need: MIN_LANDMARKS,
            });
        }

        let point = |index: usize| {
            landmarks.get(index).ok_or(SignalError::ShortLandmarkSet {
                got: landmarks.len(),
                need: MIN_LANDMARKS,
            })
        };

        let left_inner = point(LEFT_EYE_INNER)?;
        let left_outer = point(LEFT_EYE_OUTER)?;
        let right_inner = point(RIGHT_EYE_INNER)?;
        let right_outer = point(RIGHT_EYE_OUTER)?;

        let left_width = (left_inner[0] - left_outer[0]).abs();
        let right_width = (right_inner[0] - right_outer[0]).abs();
        let ratio = if right_width > 0.0 {
            left_width / right_width
        } else {
            1.0
        };

        self.direction = if ratio < 1.0 - self.threshold {
            GazeDirection::Right
        } else if ratio > 1.0 + self.threshold {
            GazeDirection::Left
        } else {
            GazeDirection::Center
        };

        Ok(self.direction)
    }

    /// Last classified direction.
    pub fn direction(&self) -> GazeDirection {
        self.direction
    }
}

impl Default for GazeSignal {
    fn default() -> Self {
        Self::new()
    }
}
