//! Yawn detection from the mouth aspect ratio.

use crate::capture::{LandmarkSet, MIN_LANDMARKS};
use crate::signals::{planar_distance, SignalError};

const TOP_LIP: usize = 13;
const BOTTOM_LIP: usize = 14;
const LEFT_MOUTH: usize = 78;
const RIGHT_MOUTH: usize = 308;

const DEFAULT_YAWN_THRESHOLD: f64 = 0.6;
const DEFAULT_CONSECUTIVE_FRAMES: u32 = 2;

/// Stateful yawn detector: mouth opening over mouth width, debounced
/// the same way blinks are.
pub struct YawnSignal {
    yawn_threshold: f64,
    consecutive_frames: u32,
    open_frames: u32,
    yawn_count: u32,
    is_yawning: bool,
}

impl YawnSignal {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_YAWN_THRESHOLD, DEFAULT_CONSECUTIVE_FRAMES)
    }

    pub fn with_thresholds(yawn_threshold: f64, consecutive_frames: u32) -> Self {
        Self {
            yawn_threshold,
            consecutive_frames,
            open_frames: 0,
            yawn_count: 0,
            is_yawning: false,
        }
    }

    /// Update yawn state from one frame's landmarks.
    ///
    /// Returns the current yawn flag and the yawn count accumulated since
    /// the last window reset.
    pub fn analyze(&mut self, landmarks: &LandmarkSet) -> Result<(bool, u32), SignalError> {
        let mar = mouth_aspect_ratio(landmarks)?;

        if mar > self.yawn_threshold {
            self.open_frames += 1;
        } else {
            if self.open_frames >= self.consecutive_frames {
                self.yawn_count += 1;
                self.is_yawning = true;
            } else {
                self.is_yawning = false;
            }
            self.open_frames = 0;
        }

        Ok((self.is_yawning, self.yawn_count))
    }

    /// Zero the window-local yawn counter. Debounce state is preserved.
    pub fn reset_window_count(&mut self) {
        self.yawn_count = 0;
    }
}

impl Default for YawnSignal {
    fn default() -> Self {
        Self::new()
    }
}

fn mouth_aspect_ratio(landmarks: &LandmarkSet) -> Result<f64, SignalError> {
    let point = |index: usize| {
        landmarks.get(index).ok_or(SignalError::ShortLandmarkSet {
            got: landmarks.len(),
            need: MIN_LANDMARKS,
        })
    };

    let vertical = planar_distance(point(TOP_LIP)?, point(BOTTOM_LIP)?);
    let horizontal = planar_distance(point(LEFT_MOUTH)?, point(RIGHT_MOUTH)?);
    if horizontal == 0.0 {
        Ok(0.0)
    } else {
        Ok(vertical / horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::synthetic::neutral_face;

    fn open_mouth() -> LandmarkSet {
        let mut face = neutral_face();
        // Lips 30px apart over a 40px mouth: aspect ratio 0.75.
        face.set(TOP_LIP, [170.0, 140.0, 0.0]);
        face.set(BOTTOM_LIP, [170.0, 170.0, 0.0]);
        face
    }

    #[test]
    fn test_closed_mouth_does_not_yawn() {
        let mut yawn = YawnSignal::new();
        for _ in 0..10 {
            let (yawning, count) = yawn.analyze(&neutral_face()).unwrap();
            assert!(!yawning);
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_yawn_counted_after_debounce() {
        let mut yawn = YawnSignal::new();
        yawn.analyze(&open_mouth()).unwrap();
        yawn.analyze(&open_mouth()).unwrap();
        yawn.analyze(&open_mouth()).unwrap();
        let (yawning, count) = yawn.analyze(&neutral_face()).unwrap();
        assert!(yawning);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_short_landmark_set_errors() {
        let mut yawn = YawnSignal::new();
        let short = LandmarkSet::new(vec![[0.0; 3]; 10]);
        assert!(matches!(
            yawn.analyze(&short),
            Err(SignalError::ShortLandmarkSet { .. })
        ));
    }
}
