//! JSON file persistence for session snapshot lists.

use std::path::{Path, PathBuf};

use crate::core::snapshot::SessionSnapshot;

/// Persistence errors. Isolated at this boundary: callers of `save` get
/// them as results, callers of `load` never see them.
#[derive(Debug)]
pub enum RepositoryError {
    Io(String),
    Serialize(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::Io(e) => write!(f, "IO error: {e}"),
            RepositoryError::Serialize(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Loads and saves the session snapshot list as a single file holding a
/// JSON array, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    path: PathBuf,
}

impl SessionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the backing file with the given snapshots.
    pub fn save(&self, snapshots: &[SessionSnapshot]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RepositoryError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshots)
            .map_err(|e| RepositoryError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| RepositoryError::Io(e.to_string()))?;

        log::info!("saved {} snapshots to {:?}", snapshots.len(), self.path);
        Ok(())
    }

    /// Load the last persisted snapshot list.
    ///
    /// Missing, unreadable or corrupt files yield an empty list; the
    /// cause is logged, never raised.
    pub fn load(&self) -> Vec<SessionSnapshot> {
        if !self.path.exists() {
            log::warn!("session file {:?} not found", self.path);
            return Vec::new();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("error reading session file {:?}: {e}", self.path);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<SessionSnapshot>>(&content) {
            Ok(snapshots) => {
                log::info!("loaded {} session records", snapshots.len());
                snapshots
            }
            Err(e) => {
                log::error!("error parsing session file {:?}: {e}", self.path);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score::OverloadLabel;
    use crate::signals::{empty_expression_counts, Expression, GazeDirection};
    use chrono::Utc;
    use uuid::Uuid;

    fn temp_repository(tag: &str) -> SessionRepository {
        let path = std::env::temp_dir()
            .join("cogload-tests")
            .join(format!("{tag}_{}.json", Uuid::new_v4()));
        SessionRepository::new(path)
    }

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            session_id: Uuid::new_v4(),
            start_time: Utc::now(),
            end_time: None,
            blink_count: 5,
            is_blinking: false,
            yawn_count: 0,
            is_yawning: false,
            gaze_direction: GazeDirection::Center,
            current_expression: Expression::Neutral,
            expression_counts: empty_expression_counts(),
            typing_speed: 110.0,
            error_count: 0,
            backspace_count: 1,
            sample_count: 42,
            cognitive_score: 6.0,
            overload_label: OverloadLabel::Overload,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let repo = temp_repository("round_trip");
        let snapshots = vec![snapshot(), snapshot()];

        repo.save(&snapshots).unwrap();
        let loaded = repo.load();
        assert_eq!(loaded, snapshots);

        let _ = std::fs::remove_file(repo.path());
    }

    #[test]
    fn test_save_overwrites() {
        let repo = temp_repository("overwrite");

        repo.save(&[snapshot(), snapshot(), snapshot()]).unwrap();
        repo.save(&[snapshot()]).unwrap();
        assert_eq!(repo.load().len(), 1);

        let _ = std::fs::remove_file(repo.path());
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let repo = temp_repository("missing");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_returns_empty() {
        let repo = temp_repository("corrupt");
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(repo.path(), "not json {").unwrap();

        assert!(repo.load().is_empty());

        let _ = std::fs::remove_file(repo.path());
    }

    #[test]
    fn test_empty_list_round_trips() {
        let repo = temp_repository("empty");
        repo.save(&[]).unwrap();
        assert!(repo.load().is_empty());

        let _ = std::fs::remove_file(repo.path());
    }
}
