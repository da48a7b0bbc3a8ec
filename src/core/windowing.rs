//! Windowed aggregation of per-second signal samples.
//!
//! Samples accumulate into a fixed-duration window. A window closes when
//! the elapsed time since its start reaches the window duration, or on
//! the very first sample of the session so the user is not left without
//! feedback for a full window. Closing scores the aggregate and emits an
//! immutable [`SessionSnapshot`]; between closes the partial aggregate is
//! not observable.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::score::{ScoreEngine, ScoreFeatures};
use crate::core::snapshot::SessionSnapshot;
use crate::signals::{
    empty_expression_counts, Expression, ExpressionCounts, GazeDirection, SignalSample,
};

/// Accumulates signal samples over a fixed time window and emits scored
/// snapshots at window boundaries.
pub struct WindowAggregator {
    duration: chrono::Duration,
    engine: ScoreEngine,
    session_id: Uuid,

    window_start: DateTime<Utc>,
    samples_in_window: u32,
    total_samples: u64,

    // Last-seen per-signal values (cues that don't aggregate additively)
    blink_count: u32,
    is_blinking: bool,
    yawn_count: u32,
    is_yawning: bool,
    gaze: GazeDirection,
    expression: Expression,
    expression_counts: ExpressionCounts,

    // Additive accumulators
    typing_speed_sum: f64,
    backspace_count: u32,
    error_count: u32,

    // Per-window gaze tallies, diagnostic only
    gaze_left: u32,
    gaze_right: u32,
    gaze_center: u32,
}

impl WindowAggregator {
    /// Create an aggregator whose first window opens at `started_at`.
    pub fn new(
        session_id: Uuid,
        window_duration: Duration,
        engine: ScoreEngine,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            duration: chrono::Duration::milliseconds(window_duration.as_millis() as i64),
            engine,
            session_id,
            window_start: started_at,
            samples_in_window: 0,
            total_samples: 0,
            blink_count: 0,
            is_blinking: false,
            yawn_count: 0,
            is_yawning: false,
            gaze: GazeDirection::Center,
            expression: Expression::Neutral,
            expression_counts: empty_expression_counts(),
            typing_speed_sum: 0.0,
            backspace_count: 0,
            error_count: 0,
            gaze_left: 0,
            gaze_right: 0,
            gaze_center: 0,
        }
    }

    /// Fold one sample into the open window.
    ///
    /// Returns a snapshot when this sample closes the window: either the
    /// elapsed time since window start has reached the window duration,
    /// or this is the first sample the session has ever ingested.
    pub fn ingest(&mut self, sample: &SignalSample) -> Option<SessionSnapshot> {
        self.samples_in_window += 1;
        self.total_samples += 1;

        self.blink_count = sample.blink_count;
        self.is_blinking = sample.is_blinking;
        self.yawn_count = sample.yawn_count;
        self.is_yawning = sample.is_yawning;
        self.gaze = sample.gaze;
        self.expression = sample.expression;
        self.expression_counts = sample.expression_counts.clone();

        self.typing_speed_sum += sample.typing_speed;
        self.backspace_count += sample.backspace_count;
        self.error_count += sample.error_count;

        match sample.gaze {
            GazeDirection::Left => self.gaze_left += 1,
            GazeDirection::Right => self.gaze_right += 1,
            GazeDirection::Center => self.gaze_center += 1,
        }

        if self.total_samples == 1 || sample.at - self.window_start >= self.duration {
            Some(self.close(sample.at))
        } else {
            None
        }
    }

    /// Apply elapsed-time window closing without a sample.
    ///
    /// Called on seconds where no signal was dispatched (no face, or a
    /// producer error) so that wall-clock closing still happens. Silent
    /// until the session has ingested its first sample.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<SessionSnapshot> {
        if self.total_samples > 0 && now - self.window_start >= self.duration {
            Some(self.close(now))
        } else {
            None
        }
    }

    /// Samples folded into the currently open window.
    pub fn samples_in_window(&self) -> u32 {
        self.samples_in_window
    }

    /// Score the aggregate, emit the snapshot and reset for the next
    /// window.
    fn close(&mut self, now: DateTime<Utc>) -> SessionSnapshot {
        let avg_typing_speed = self.typing_speed_sum / u32::max(1, self.samples_in_window) as f64;

        let features = ScoreFeatures {
            blink_count: self.blink_count,
            yawn_count: self.yawn_count,
            gaze_direction: self.gaze,
            current_expression: self.expression,
            typing_speed: avg_typing_speed,
            backspace_count: self.backspace_count,
            error_count: self.error_count,
        };
        let (score, label) = self.engine.score(&features);

        log::debug!(
            "window closed: {} samples, gaze L/R/C {}/{}/{}, score {score:.1} ({label})",
            self.samples_in_window,
            self.gaze_left,
            self.gaze_right,
            self.gaze_center,
        );

        let snapshot = SessionSnapshot {
            session_id: self.session_id,
            start_time: self.window_start,
            end_time: Some(now),
            blink_count: self.blink_count,
            is_blinking: self.is_blinking,
            yawn_count: self.yawn_count,
            is_yawning: self.is_yawning,
            gaze_direction: self.gaze,
            current_expression: self.expression,
            expression_counts: self.expression_counts.clone(),
            typing_speed: avg_typing_speed,
            error_count: self.error_count,
            backspace_count: self.backspace_count,
            sample_count: self.samples_in_window,
            cognitive_score: score,
            overload_label: label,
        };

        self.samples_in_window = 0;
        self.blink_count = 0;
        self.yawn_count = 0;
        self.typing_speed_sum = 0.0;
        self.backspace_count = 0;
        self.error_count = 0;
        self.gaze_left = 0;
        self.gaze_right = 0;
        self.gaze_center = 0;
        self.window_start = now;

        snapshot
    }
}
