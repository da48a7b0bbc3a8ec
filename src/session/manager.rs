//! Session lifecycle and the per-second sampling loop.
//!
//! The manager owns the capture device, the landmark extractor, the
//! signal producers and the aggregator for the duration of a session.
//! `start` moves them into a dedicated sampling thread; `stop` signals a
//! cooperative cancellation flag, joins the thread and takes the
//! collaborators back. The worker itself releases the device, stops the
//! keystroke source and persists the history before it returns, so every
//! exit path (requested stop, quit keystroke, fatal capture error) runs
//! the same teardown and the join ordering leaves no I/O race.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::capture::{CaptureDevice, CaptureError, LandmarkExtractor};
use crate::core::score::{ScoreConfig, ScoreEngine};
use crate::core::snapshot::SessionSnapshot;
use crate::core::windowing::WindowAggregator;
use crate::session::repository::{RepositoryError, SessionRepository};
use crate::signals::{ExpressionClassifier, KeyKind, KeystrokeSource, SignalBank, SignalError};

/// Why a sampling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was requested by the controller
    Requested,
    /// The quit keystroke was sampled
    QuitKey,
    /// A frame read failed mid-session
    CaptureFailed(String),
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Requested => write!(f, "stop requested"),
            StopReason::QuitKey => write!(f, "quit keystroke"),
            StopReason::CaptureFailed(e) => write!(f, "capture failed: {e}"),
        }
    }
}

/// Outcome of a finished session, returned by [`SessionManager::stop`].
#[derive(Debug)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub reason: StopReason,
    /// The full in-memory history, also persisted (unless noted below).
    pub snapshots: Vec<SessionSnapshot>,
    /// Set when the final persistence attempt failed; the history above
    /// is still intact.
    pub persist_error: Option<RepositoryError>,
}

/// Errors surfaced by session lifecycle operations.
#[derive(Debug)]
pub enum SessionError {
    /// `start` was called while a session is active
    AlreadyRunning,
    /// `stop` was called with no session active
    NotRunning,
    /// The capture device could not be acquired
    Capture(CaptureError),
    /// The keystroke source could not be started
    Keystrokes(SignalError),
    /// The sampling thread was lost
    Thread(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::AlreadyRunning => write!(f, "session already running"),
            SessionError::NotRunning => write!(f, "no active session"),
            SessionError::Capture(e) => write!(f, "{e}"),
            SessionError::Keystrokes(e) => write!(f, "{e}"),
            SessionError::Thread(e) => write!(f, "sampling thread error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// External collaborators a session samples from. Exclusively owned by
/// the sampling thread while the session is Running.
pub struct SessionDeps {
    pub capture: Box<dyn CaptureDevice>,
    pub landmarks: Box<dyn LandmarkExtractor>,
    pub expression: Box<dyn ExpressionClassifier>,
    pub keystrokes: Box<dyn KeystrokeSource>,
}

/// Owns a session's collaborators and lifecycle.
///
/// States: Idle (collaborators held here) -> Running (collaborators moved
/// into the sampling thread) -> Idle (handed back on join).
pub struct SessionManager {
    window_duration: Duration,
    scoring: ScoreConfig,
    repository: SessionRepository,
    deps: Option<SessionDeps>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<(SessionDeps, SessionReport)>>,
}

impl SessionManager {
    pub fn new(
        deps: SessionDeps,
        window_duration: Duration,
        scoring: ScoreConfig,
        repository: SessionRepository,
    ) -> Self {
        Self {
            window_duration,
            scoring,
            repository,
            deps: Some(deps),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Whether the sampling loop is currently active.
    pub fn is_running(&self) -> bool {
        self.worker.is_some() && self.running.load(Ordering::SeqCst)
    }

    /// Acquire resources and spawn the sampling loop.
    ///
    /// Fails without entering Running if a session is already active or
    /// if the capture device / keystroke source cannot be acquired.
    pub fn start(&mut self) -> Result<Uuid, SessionError> {
        if self.worker.is_some() {
            log::warn!("session already running");
            return Err(SessionError::AlreadyRunning);
        }

        let mut deps = self
            .deps
            .take()
            .ok_or_else(|| SessionError::Thread("session collaborators unavailable".to_string()))?;

        if let Err(e) = deps.capture.open() {
            log::error!("cannot open capture device: {e}");
            self.deps = Some(deps);
            return Err(SessionError::Capture(e));
        }
        if let Err(e) = deps.keystrokes.start() {
            log::error!("cannot start keystroke source: {e}");
            deps.capture.close();
            self.deps = Some(deps);
            return Err(SessionError::Keystrokes(e));
        }

        let session_id = Uuid::new_v4();
        self.running.store(true, Ordering::SeqCst);

        let worker = SamplingWorker {
            deps,
            running: self.running.clone(),
            session_id,
            window_duration: self.window_duration,
            scoring: self.scoring.clone(),
            repository: self.repository.clone(),
        };
        self.worker = Some(thread::spawn(move || worker.run()));

        log::info!("session {session_id} started");
        Ok(session_id)
    }

    /// Signal the sampling loop to stop and wait for it to exit.
    ///
    /// Blocks on the thread join; by the time it returns the device is
    /// released and the history persisted. Returns the session report.
    pub fn stop(&mut self) -> Result<SessionReport, SessionError> {
        let handle = self.worker.take().ok_or_else(|| {
            log::warn!("no session running");
            SessionError::NotRunning
        })?;

        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok((deps, report)) => {
                self.deps = Some(deps);
                log::info!(
                    "session {} stopped ({}), {} snapshots",
                    report.session_id,
                    report.reason,
                    report.snapshots.len()
                );
                Ok(report)
            }
            Err(_) => Err(SessionError::Thread("sampling thread panicked".to_string())),
        }
    }
}

/// The sampling loop state, moved onto the dedicated thread.
struct SamplingWorker {
    deps: SessionDeps,
    running: Arc<AtomicBool>,
    session_id: Uuid,
    window_duration: Duration,
    scoring: ScoreConfig,
    repository: SessionRepository,
}

impl SamplingWorker {
    /// Run the loop to completion, then tear down and hand the
    /// collaborators back with the session report.
    fn run(mut self) -> (SessionDeps, SessionReport) {
        let started_at = Utc::now();
        let mut aggregator = WindowAggregator::new(
            self.session_id,
            self.window_duration,
            ScoreEngine::new(self.scoring.clone()),
            started_at,
        );
        let mut bank = SignalBank::new(started_at);
        let mut history: Vec<SessionSnapshot> = Vec::new();
        let mut prev_second: Option<i64> = None;
        let mut reason = StopReason::Requested;

        while self.running.load(Ordering::SeqCst) {
            let frame = match self.deps.capture.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("failed to read frame: {e}");
                    reason = StopReason::CaptureFailed(e.to_string());
                    break;
                }
            };

            // Keystrokes drain every iteration so quit latency stays
            // within one frame interval.
            let mut quit = false;
            for event in self.deps.keystrokes.poll() {
                if event.kind == KeyKind::Quit {
                    quit = true;
                }
                bank.record_key(&event);
            }
            if quit {
                log::info!("quit signal received");
                reason = StopReason::QuitKey;
                break;
            }

            // At most one dispatch per whole wall-clock second.
            let now = Utc::now();
            let second = now.timestamp();
            if prev_second == Some(second) {
                continue;
            }
            prev_second = Some(second);

            let closed = match self.deps.landmarks.get_landmarks(&frame) {
                Some(landmarks) => {
                    match bank.dispatch(now, &frame, &landmarks, self.deps.expression.as_mut()) {
                        Ok(sample) => aggregator.ingest(&sample),
                        Err(e) => {
                            log::warn!("signal dispatch failed, skipping this second: {e}");
                            aggregator.tick(now)
                        }
                    }
                }
                None => {
                    log::warn!("no face detected in frame");
                    aggregator.tick(now)
                }
            };

            if let Some(snapshot) = closed {
                history.push(snapshot);
                bank.reset_window_counts(now);
            }
        }

        self.running.store(false, Ordering::SeqCst);

        // Teardown order: release the device and stop the keystroke
        // source before persisting, so nothing races the file write.
        self.deps.capture.close();
        self.deps.keystrokes.stop();

        let persist_error = match self.repository.save(&history) {
            Ok(()) => None,
            Err(e) => {
                log::error!("failed to persist session history: {e}");
                Some(e)
            }
        };

        let report = SessionReport {
            session_id: self.session_id,
            reason,
            snapshots: history,
            persist_error,
        };
        (self.deps, report)
    }
}
