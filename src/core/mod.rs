//! Core scoring and aggregation for the cognitive overload monitor.
//!
//! This module contains:
//! - Window aggregation of per-second signal samples
//! - Cognitive overload scoring with configurable weights
//! - The persisted session snapshot record

pub mod score;
pub mod snapshot;
pub mod windowing;

// Re-export commonly used types
pub use score::{OverloadLabel, ScoreConfig, ScoreEngine, ScoreFeatures, ScoreWeights};
pub use snapshot::SessionSnapshot;
pub use windowing::WindowAggregator;
