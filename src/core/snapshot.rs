//! Persisted session snapshot record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::score::OverloadLabel;
use crate::signals::{Expression, ExpressionCounts, GazeDirection};

/// One immutable aggregate record covering one window.
///
/// Created only at window close and never mutated after being appended
/// to the session history. Serializes to the session-file JSON object:
/// timestamps as RFC3339 strings, the session id as a UUID string, the
/// expression histogram with all seven classes present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier shared by every snapshot of one session
    pub session_id: Uuid,
    /// Window start time
    pub start_time: DateTime<Utc>,
    /// Window end time
    pub end_time: Option<DateTime<Utc>>,

    // Facial cues
    pub blink_count: u32,
    pub is_blinking: bool,
    pub yawn_count: u32,
    pub is_yawning: bool,
    pub gaze_direction: GazeDirection,
    pub current_expression: Expression,
    pub expression_counts: ExpressionCounts,

    // Keyboard metrics
    /// Average typing speed over the window, chars/minute
    pub typing_speed: f64,
    pub error_count: u32,
    pub backspace_count: u32,

    /// Signal dispatches aggregated into this window. Absent in files
    /// written by older builds, hence the default.
    #[serde(default)]
    pub sample_count: u32,

    // Overload analysis
    pub cognitive_score: f64,
    pub overload_label: OverloadLabel,
}
