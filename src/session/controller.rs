//! Mutex-guarded session lifecycle gate.
//!
//! Serializes start/stop against concurrent callers and guarantees at
//! most one running session. The lock covers only the state check and
//! transition, never the sampling loop itself. Session data reads go to
//! the repository's last persisted copy, not a live manager's in-memory
//! history.

use std::sync::Mutex;

use uuid::Uuid;

use crate::core::snapshot::SessionSnapshot;
use crate::session::manager::{SessionError, SessionManager, SessionReport};
use crate::session::repository::SessionRepository;

/// Builds a freshly wired [`SessionManager`] for each session.
pub type ManagerFactory = Box<dyn Fn() -> SessionManager + Send + Sync>;

/// Thin synchronization wrapper in front of [`SessionManager`].
pub struct SessionController {
    manager: Mutex<Option<SessionManager>>,
    factory: ManagerFactory,
    repository: SessionRepository,
}

impl SessionController {
    pub fn new(
        repository: SessionRepository,
        factory: impl Fn() -> SessionManager + Send + Sync + 'static,
    ) -> Self {
        Self {
            manager: Mutex::new(None),
            factory: Box::new(factory),
            repository,
        }
    }

    /// Start a new session. Errors if one is already running.
    pub fn start_session(&self) -> Result<Uuid, SessionError> {
        let mut guard = self
            .manager
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if guard.as_ref().is_some_and(|m| m.is_running()) {
            log::warn!("session already running");
            return Err(SessionError::AlreadyRunning);
        }

        let mut manager = (self.factory)();
        let session_id = manager.start()?;
        *guard = Some(manager);
        Ok(session_id)
    }

    /// Stop the active session. Errors if none is running.
    pub fn stop_session(&self) -> Result<SessionReport, SessionError> {
        let mut guard = self
            .manager
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match guard.as_mut() {
            Some(manager) => manager.stop(),
            None => {
                log::warn!("no active session to stop");
                Err(SessionError::NotRunning)
            }
        }
    }

    /// Read the last persisted session.
    ///
    /// Never reaches into a live manager's mutating history; the
    /// repository copy is the only data visible while Running.
    pub fn get_session_data(&self) -> Vec<SessionSnapshot> {
        self.repository.load()
    }
}
