//! Blink detection from the eye aspect ratio.
//!
//! The aspect ratio of each eye is computed from six mesh points (two
//! lid pairs over the corner-to-corner width); a ratio below the
//! threshold for enough consecutive frames counts as one blink.

use crate::capture::{LandmarkSet, MIN_LANDMARKS};
use crate::signals::{planar_distance, SignalError};

/// Mesh indices outlining each eye: corner, upper lid x2, corner, lower lid x2.
const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

const DEFAULT_BLINK_THRESHOLD: f64 = 0.21;
const DEFAULT_CONSECUTIVE_FRAMES: u32 = 2;

/// Stateful blink detector.
pub struct EyeSignal {
    blink_threshold: f64,
    consecutive_frames: u32,
    closed_frames: u32,
    blink_count: u32,
    is_blinking: bool,
}

impl EyeSignal {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_BLINK_THRESHOLD, DEFAULT_CONSECUTIVE_FRAMES)
    }

    pub fn with_thresholds(blink_threshold: f64, consecutive_frames: u32) -> Self {
        Self {
            blink_threshold,
            consecutive_frames,
            closed_frames: 0,
            blink_count: 0,
            is_blinking: false,
        }
    }

    /// Update blink state from one frame's landmarks.
    ///
    /// Returns the current blink flag and the blink count accumulated
    /// since the last window reset.
    pub fn analyze(&mut self, landmarks: &LandmarkSet) -> Result<(bool, u32), SignalError> {
        let left = eye_points(landmarks, &LEFT_EYE)?;
        let right = eye_points(landmarks, &RIGHT_EYE)?;
        let ear = (aspect_ratio(&left) + aspect_ratio(&right)) / 2.0;

        if ear < self.blink_threshold {
            self.closed_frames += 1;
        } else {
            if self.closed_frames >= self.consecutive_frames {
                self.blink_count += 1;
                self.is_blinking = true;
            } else {
                self.is_blinking = false;
            }
            self.closed_frames = 0;
        }

        Ok((self.is_blinking, self.blink_count))
    }

    /// Zero the window-local blink counter. Debounce state is preserved.
    pub fn reset_window_count(&mut self) {
        self.blink_count = 0;
    }
}

impl Default for EyeSignal {
    fn default() -> Self {
        Self::new()
    }
}

fn eye_points(landmarks: &LandmarkSet, indices: &[usize; 6]) -> Result<[[f64; 3]; 6], SignalError> {
    let mut points = [[0.0; 3]; 6];
    for (slot, &index) in points.iter_mut().zip(indices.iter()) {
        *slot = landmarks.get(index).ok_or(SignalError::ShortLandmarkSet {
            got: landmarks.len(),
            need: MIN_LANDMARKS,
        })?;
    }
    Ok(points)
}

/// Eye aspect ratio: mean lid gap over eye width.
fn aspect_ratio(eye: &[[f64; 3]; 6]) -> f64 {
    let a = planar_distance(eye[1], eye[5]);
    let b = planar_distance(eye[2], eye[4]);
    let c = planar_distance(eye[0], eye[3]);
    if c == 0.0 {
        0.0
    } else {
        (a + b) / (2.0 * c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::synthetic::neutral_face;

    fn closed_eyes() -> LandmarkSet {
        let mut face = neutral_face();
        // Lids 1px apart: aspect ratio 0.025, well under the threshold.
        face.set(160, [110.0, 99.5, 0.0]);
        face.set(158, [130.0, 99.5, 0.0]);
        face.set(144, [110.0, 100.5, 0.0]);
        face.set(153, [130.0, 100.5, 0.0]);
        face.set(385, [210.0, 99.5, 0.0]);
        face.set(387, [230.0, 99.5, 0.0]);
        face.set(380, [210.0, 100.5, 0.0]);
        face.set(373, [230.0, 100.5, 0.0]);
        face
    }

    #[test]
    fn test_open_eyes_do_not_blink() {
        let mut eye = EyeSignal::new();
        for _ in 0..10 {
            let (blinking, count) = eye.analyze(&neutral_face()).unwrap();
            assert!(!blinking);
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_blink_needs_consecutive_closed_frames() {
        let mut eye = EyeSignal::new();

        // One closed frame is noise, not a blink.
        eye.analyze(&closed_eyes()).unwrap();
        let (blinking, count) = eye.analyze(&neutral_face()).unwrap();
        assert!(!blinking);
        assert_eq!(count, 0);

        // Two closed frames followed by reopening is one blink.
        eye.analyze(&closed_eyes()).unwrap();
        eye.analyze(&closed_eyes()).unwrap();
        let (blinking, count) = eye.analyze(&neutral_face()).unwrap();
        assert!(blinking);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_window_reset_keeps_debounce_state() {
        let mut eye = EyeSignal::new();
        eye.analyze(&closed_eyes()).unwrap();
        eye.analyze(&closed_eyes()).unwrap();
        eye.analyze(&neutral_face()).unwrap();

        eye.reset_window_count();
        let (_, count) = eye.analyze(&neutral_face()).unwrap();
        assert_eq!(count, 0);

        // Counting continues from zero after the reset.
        eye.analyze(&closed_eyes()).unwrap();
        eye.analyze(&closed_eyes()).unwrap();
        let (_, count) = eye.analyze(&neutral_face()).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_short_landmark_set_errors() {
        let mut eye = EyeSignal::new();
        let short = LandmarkSet::new(vec![[0.0; 3]; 10]);
        assert!(matches!(
            eye.analyze(&short),
            Err(SignalError::ShortLandmarkSet { .. })
        ));
    }
}
