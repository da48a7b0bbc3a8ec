//! Demonstration of a scripted monitoring session.
//!
//! This example shows how to:
//! 1. Wire a session manager with synthetic collaborators
//! 2. Feed keystrokes while the sampling loop runs
//! 3. Stop the session and inspect the scored snapshots
//!
//! Run with: cargo run --example overload_demo

use std::thread;
use std::time::Duration;

use cogload::capture::{neutral_face, StaticFace, SyntheticCapture};
use cogload::session::{SessionDeps, SessionManager, SessionRepository};
use cogload::signals::{ChannelKeystrokes, Expression, FixedClassifier, KeyKind};
use cogload::{ScoreConfig, VERSION};

fn main() {
    env_logger::init();

    println!("Cogload Monitor - Session Demo");
    println!("==============================");
    println!("Version: {VERSION}");
    println!();

    let session_file = std::env::temp_dir().join("cogload_demo_session.json");
    let repository = SessionRepository::new(session_file.clone());

    // Synthetic seams: a paced frame source, a fixed neutral face, a
    // classifier that always reports surprise, and a keystroke channel
    // this demo feeds by hand.
    let (keystrokes, feed) = ChannelKeystrokes::pair();
    let deps = SessionDeps {
        capture: Box::new(SyntheticCapture::new(Duration::from_millis(20))),
        landmarks: Box::new(StaticFace::new(neutral_face())),
        expression: Box::new(FixedClassifier(Expression::Surprise)),
        keystrokes: Box::new(keystrokes),
    };

    let mut manager = SessionManager::new(
        deps,
        Duration::from_secs(60),
        ScoreConfig::default(),
        repository,
    );

    let session_id = match manager.start() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error starting session: {e}");
            return;
        }
    };
    println!("Session {session_id} running for ~3 seconds...");

    // Simulate a burst of typing with a couple of corrections.
    for _ in 0..20 {
        feed.press(KeyKind::Printable);
    }
    feed.press(KeyKind::Backspace);
    feed.press(KeyKind::Backspace);

    thread::sleep(Duration::from_secs(3));

    match manager.stop() {
        Ok(report) => {
            println!("Session stopped ({})", report.reason);
            println!();
            println!("Snapshots:");
            for snapshot in &report.snapshots {
                println!(
                    "  score {:.1} ({}) | expr {} | typing {:.0} cpm | {} backspaces | {} samples",
                    snapshot.cognitive_score,
                    snapshot.overload_label,
                    snapshot.current_expression,
                    snapshot.typing_speed,
                    snapshot.backspace_count,
                    snapshot.sample_count,
                );
            }
            println!();
            println!("Persisted {} snapshots to {:?}", report.snapshots.len(), session_file);
        }
        Err(e) => eprintln!("Error stopping session: {e}"),
    }
}
