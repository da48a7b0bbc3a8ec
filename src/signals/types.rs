//! Metric and sample types shared by the signal producers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gaze direction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GazeDirection {
    Left,
    Right,
    #[default]
    Center,
}

impl std::fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GazeDirection::Left => "Left",
            GazeDirection::Right => "Right",
            GazeDirection::Center => "Center",
        };
        write!(f, "{name}")
    }
}

/// Facial expression classes tracked by the expression histogram.
///
/// Variant order fixes the key order of serialized histograms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Happy,
    Sad,
    Angry,
    Surprise,
    #[default]
    Neutral,
    Disgust,
    Fear,
}

impl Expression {
    /// Every tracked expression class.
    pub const ALL: [Expression; 7] = [
        Expression::Happy,
        Expression::Sad,
        Expression::Angry,
        Expression::Surprise,
        Expression::Neutral,
        Expression::Disgust,
        Expression::Fear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprise => "surprise",
            Expression::Neutral => "neutral",
            Expression::Disgust => "disgust",
            Expression::Fear => "fear",
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running histogram of detected expressions.
pub type ExpressionCounts = BTreeMap<Expression, u32>;

/// Build a histogram with every expression class present and zeroed.
pub fn empty_expression_counts() -> ExpressionCounts {
    Expression::ALL.iter().map(|e| (*e, 0)).collect()
}

/// Classified keystroke kinds delivered by a [`KeystrokeSource`].
///
/// [`KeystrokeSource`]: crate::signals::keyboard::KeystrokeSource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// A printable character (counts toward typing speed)
    Printable,
    /// Backspace
    Backspace,
    /// The session quit key
    Quit,
    /// Anything else (modifiers, navigation, function keys)
    Other,
}

/// A single keystroke event.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// Timestamp when the key was pressed
    pub at: DateTime<Utc>,
    /// Classified key kind
    pub kind: KeyKind,
}

impl KeyEvent {
    /// Create an event stamped with the current time.
    pub fn now(kind: KeyKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }
}

/// One second's fused signal output, produced while a face is present.
///
/// Consumed immediately by the window aggregator; never persisted.
#[derive(Debug, Clone)]
pub struct SignalSample {
    /// Timestamp of the dispatched second
    pub at: DateTime<Utc>,
    /// Whether a blink was in progress this second
    pub is_blinking: bool,
    /// Blinks counted since the last window reset
    pub blink_count: u32,
    /// Whether a yawn was in progress this second
    pub is_yawning: bool,
    /// Yawns counted since the last window reset
    pub yawn_count: u32,
    /// Gaze direction this second
    pub gaze: GazeDirection,
    /// Latest dominant expression
    pub expression: Expression,
    /// Running expression histogram since session start
    pub expression_counts: ExpressionCounts,
    /// Typing speed in chars/minute over the window so far
    pub typing_speed: f64,
    /// Backspaces since the previous sample
    pub backspace_count: u32,
    /// Detected correction errors since the previous sample
    pub error_count: u32,
}
