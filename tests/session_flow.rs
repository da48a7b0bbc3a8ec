//! Integration tests for session lifecycle and persistence.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use cogload::capture::{neutral_face, NoFace, StaticFace, SyntheticCapture};
use cogload::session::{
    SessionController, SessionDeps, SessionError, SessionManager, SessionRepository, StopReason,
};
use cogload::signals::{ChannelKeystrokes, KeyKind, KeystrokeFeed, NoopClassifier};
use cogload::ScoreConfig;

fn test_session_file(tag: &str) -> PathBuf {
    std::env::temp_dir()
        .join("cogload-integration-tests")
        .join(format!("{tag}_{}.json", uuid::Uuid::new_v4()))
}

fn synthetic_deps(capture: SyntheticCapture) -> (SessionDeps, KeystrokeFeed) {
    let (keystrokes, feed) = ChannelKeystrokes::pair();
    let deps = SessionDeps {
        capture: Box::new(capture),
        landmarks: Box::new(StaticFace::new(neutral_face())),
        expression: Box::new(NoopClassifier),
        keystrokes: Box::new(keystrokes),
    };
    (deps, feed)
}

fn manager_with(tag: &str, capture: SyntheticCapture) -> (SessionManager, SessionRepository, KeystrokeFeed) {
    let repository = SessionRepository::new(test_session_file(tag));
    let (deps, feed) = synthetic_deps(capture);
    let manager = SessionManager::new(
        deps,
        Duration::from_secs(60),
        ScoreConfig::default(),
        repository.clone(),
    );
    (manager, repository, feed)
}

fn fast_capture() -> SyntheticCapture {
    SyntheticCapture::new(Duration::from_millis(5))
}

#[test]
fn test_double_start_is_rejected() {
    let (mut manager, repository, _feed) = manager_with("double_start", fast_capture());

    manager.start().expect("first start succeeds");
    assert!(manager.is_running());
    assert!(matches!(
        manager.start(),
        Err(SessionError::AlreadyRunning)
    ));

    let report = manager.stop().expect("stop succeeds");
    assert_eq!(report.reason, StopReason::Requested);

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_stop_on_idle_is_rejected() {
    let (mut manager, repository, _feed) = manager_with("stop_idle", fast_capture());

    assert!(matches!(manager.stop(), Err(SessionError::NotRunning)));
    // No teardown ran, so nothing was persisted either.
    assert!(!repository.path().exists());
}

#[test]
fn test_unavailable_device_blocks_start() {
    let (mut manager, repository, _feed) =
        manager_with("unavailable_device", SyntheticCapture::unavailable());

    assert!(matches!(manager.start(), Err(SessionError::Capture(_))));
    assert!(!manager.is_running());
    // The manager never entered Running; a stop is still lifecycle misuse.
    assert!(matches!(manager.stop(), Err(SessionError::NotRunning)));
    assert!(!repository.path().exists());
}

#[test]
fn test_short_session_records_first_sample_snapshot() {
    let (mut manager, repository, _feed) = manager_with("short_session", fast_capture());

    manager.start().expect("start succeeds");
    thread::sleep(Duration::from_millis(300));
    let report = manager.stop().expect("stop succeeds");

    assert_eq!(report.reason, StopReason::Requested);
    assert!(report.persist_error.is_none());

    // The very first dispatched sample closes a window immediately.
    assert!(!report.snapshots.is_empty());
    assert_eq!(report.snapshots[0].sample_count, 1);
    assert_eq!(report.snapshots[0].session_id, report.session_id);

    // Persisted copy matches the in-memory history field for field.
    assert_eq!(repository.load(), report.snapshots);

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_session_restarts_after_stop() {
    let (mut manager, repository, _feed) = manager_with("restart", fast_capture());

    let first_id = manager.start().expect("first start");
    thread::sleep(Duration::from_millis(150));
    manager.stop().expect("first stop");

    let second_id = manager.start().expect("second start");
    assert_ne!(first_id, second_id);
    thread::sleep(Duration::from_millis(150));
    let report = manager.stop().expect("second stop");
    assert_eq!(report.session_id, second_id);

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_capture_failure_ends_loop_and_persists() {
    let capture = fast_capture().with_failure_after(5);
    let (mut manager, repository, _feed) = manager_with("capture_failure", capture);

    manager.start().expect("start succeeds");
    thread::sleep(Duration::from_millis(300));

    // The loop died on its own; stop() reaps it and reports the cause.
    let report = manager.stop().expect("stop reaps the dead loop");
    assert!(matches!(report.reason, StopReason::CaptureFailed(_)));

    // The first frame dispatched one sample before the fault, and the
    // worker still persisted on its way out.
    assert!(!report.snapshots.is_empty());
    assert_eq!(repository.load(), report.snapshots);

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_quit_keystroke_ends_loop() {
    let (mut manager, repository, feed) = manager_with("quit_key", fast_capture());

    manager.start().expect("start succeeds");
    thread::sleep(Duration::from_millis(100));
    assert!(feed.press(KeyKind::Quit));
    thread::sleep(Duration::from_millis(200));

    assert!(!manager.is_running());
    let report = manager.stop().expect("stop reaps the finished loop");
    assert_eq!(report.reason, StopReason::QuitKey);

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_faceless_session_records_nothing() {
    let repository = SessionRepository::new(test_session_file("no_face"));
    let (keystrokes, _feed) = ChannelKeystrokes::pair();
    let deps = SessionDeps {
        capture: Box::new(fast_capture()),
        landmarks: Box::new(NoFace),
        expression: Box::new(NoopClassifier),
        keystrokes: Box::new(keystrokes),
    };
    let mut manager = SessionManager::new(
        deps,
        Duration::from_secs(60),
        ScoreConfig::default(),
        repository.clone(),
    );

    manager.start().expect("start succeeds");
    thread::sleep(Duration::from_millis(200));
    let report = manager.stop().expect("stop succeeds");

    // No face ever appeared: no samples, no windows, an empty file.
    assert!(report.snapshots.is_empty());
    assert!(repository.load().is_empty());
    assert!(repository.path().exists());

    let _ = std::fs::remove_file(repository.path());
}

#[test]
fn test_controller_serializes_lifecycle() {
    let path = test_session_file("controller");
    let repository = SessionRepository::new(path.clone());
    let factory_repository = repository.clone();

    let controller = SessionController::new(repository, move || {
        let (deps, _feed) = synthetic_deps(fast_capture());
        SessionManager::new(
            deps,
            Duration::from_secs(60),
            ScoreConfig::default(),
            factory_repository.clone(),
        )
    });

    assert!(matches!(
        controller.stop_session(),
        Err(SessionError::NotRunning)
    ));

    controller.start_session().expect("start succeeds");
    assert!(matches!(
        controller.start_session(),
        Err(SessionError::AlreadyRunning)
    ));

    thread::sleep(Duration::from_millis(300));
    let report = controller.stop_session().expect("stop succeeds");

    // get_session_data reads the persisted copy, which matches what the
    // stopped session reported.
    assert_eq!(controller.get_session_data(), report.snapshots);

    let _ = std::fs::remove_file(path);
}
