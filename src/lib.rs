//! Cogload - behavioral cognitive-overload monitor.
//!
//! Samples independent behavioral signals (eye closure, yawning, gaze,
//! facial expression, typing cadence) once per second against a shared
//! capture device, aggregates them over fixed 60-second windows, scores
//! each window with a weighted linear model, and persists the snapshot
//! time series as JSON.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Cogload Monitor                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌─────────┐ │
//! │  │ Capture  │──▶│  Signals  │──▶│ Windowing │──▶│  Score  │ │
//! │  │ (device) │   │ (5 cues)  │   │ (60s agg) │   │ (label) │ │
//! │  └──────────┘   └───────────┘   └───────────┘   └─────────┘ │
//! │        │                                             │      │
//! │        ▼                                             ▼      │
//! │  ┌──────────┐                                 ┌───────────┐ │
//! │  │ Session  │                                 │ Snapshot  │ │
//! │  │ Manager  │                                 │   (JSON)  │ │
//! │  └──────────┘                                 └───────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Frame capture, landmark extraction, the expression model and the
//! OS keystroke hook are collaborators behind traits in [`capture`] and
//! [`signals`]; synthetic implementations are bundled so the pipeline
//! runs end to end without hardware.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use cogload::capture::{neutral_face, StaticFace, SyntheticCapture};
//! use cogload::session::{SessionController, SessionDeps, SessionManager, SessionRepository};
//! use cogload::signals::{ChannelKeystrokes, NoopClassifier};
//! use cogload::ScoreConfig;
//!
//! let repository = SessionRepository::new("session_data.json");
//! let repo = repository.clone();
//! let controller = SessionController::new(repository, move || {
//!     let deps = SessionDeps {
//!         capture: Box::new(SyntheticCapture::new(Duration::from_millis(33))),
//!         landmarks: Box::new(StaticFace::new(neutral_face())),
//!         expression: Box::new(NoopClassifier),
//!         keystrokes: Box::new(ChannelKeystrokes::pair().0),
//!     };
//!     SessionManager::new(deps, Duration::from_secs(60), ScoreConfig::default(), repo.clone())
//! });
//!
//! controller.start_session().expect("start failed");
//! // ... sampling runs on its own thread ...
//! let report = controller.stop_session().expect("stop failed");
//! println!("recorded {} snapshots", report.snapshots.len());
//! ```

pub mod capture;
pub mod config;
pub mod core;
pub mod session;
pub mod signals;

// Re-export key types at crate root for convenience
pub use capture::{CaptureDevice, CaptureError, Frame, LandmarkExtractor, LandmarkSet};
pub use config::{Config, ConfigError};
pub use core::{OverloadLabel, ScoreConfig, ScoreEngine, SessionSnapshot, WindowAggregator};
pub use session::{
    SessionController, SessionDeps, SessionError, SessionManager, SessionReport,
    SessionRepository, StopReason,
};
pub use signals::{Expression, GazeDirection, SignalSample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
