//! Cogload CLI.
//!
//! Behavioral cognitive-overload monitor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use cogload::capture::{neutral_face, StaticFace, SyntheticCapture};
use cogload::session::{SessionController, SessionDeps, SessionManager, SessionRepository};
use cogload::signals::{ChannelKeystrokes, NoopClassifier};
use cogload::{Config, SessionSnapshot, VERSION};

#[derive(Parser)]
#[command(name = "cogload")]
#[command(version = VERSION)]
#[command(about = "Behavioral cognitive-overload monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a monitoring session (runs until Ctrl+C)
    Start,

    /// Print the last persisted session
    Show,

    /// Show configuration
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => cmd_start(),
        Commands::Show => cmd_show(),
        Commands::Config => cmd_config(),
    }
}

fn cmd_start() {
    let config = Config::load().unwrap_or_default();
    let repository = SessionRepository::new(config.session_file.clone());
    let controller = build_controller(&config);

    println!("Cogload Monitor v{VERSION}");
    println!("  Window duration: {}s", config.window_duration.as_secs());
    println!("  Session file: {:?}", config.session_file);
    println!();

    match controller.start_session() {
        Ok(session_id) => println!("Session {session_id} started"),
        Err(e) => {
            eprintln!("Error starting session: {e}");
            std::process::exit(1);
        }
    }

    println!("Press Ctrl+C to stop");
    println!();

    // Block until interrupted.
    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());
    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(100));
    }

    println!();
    println!("Stopping session...");
    match controller.stop_session() {
        Ok(report) => {
            println!("Session {} stopped ({})", report.session_id, report.reason);
            println!("  Snapshots recorded: {}", report.snapshots.len());
            if let Some(e) = report.persist_error {
                eprintln!("  Warning: session not persisted: {e}");
            }
        }
        Err(e) => eprintln!("Error stopping session: {e}"),
    }

    println!();
    println!("Last persisted session:");
    print_snapshots(&repository.load());
}

fn cmd_show() {
    let config = Config::load().unwrap_or_default();
    let repository = SessionRepository::new(config.session_file.clone());

    println!("Session file: {:?}", config.session_file);
    println!();
    print_snapshots(&repository.load());
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Wire a controller over synthetic collaborators.
///
/// Camera, landmark model, expression model and keystroke hook are
/// integration seams; without them the session runs against the bundled
/// synthetic device and records whatever the seams produce.
fn build_controller(config: &Config) -> SessionController {
    let repository = SessionRepository::new(config.session_file.clone());
    let window_duration = config.window_duration;
    let frame_interval = config.frame_interval;
    let scoring = config.scoring.clone();
    let factory_repository = repository.clone();

    SessionController::new(repository, move || {
        let deps = SessionDeps {
            capture: Box::new(SyntheticCapture::new(frame_interval)),
            landmarks: Box::new(StaticFace::new(neutral_face())),
            expression: Box::new(NoopClassifier),
            keystrokes: Box::new(ChannelKeystrokes::pair().0),
        };
        SessionManager::new(
            deps,
            window_duration,
            scoring.clone(),
            factory_repository.clone(),
        )
    })
}

fn print_snapshots(snapshots: &[SessionSnapshot]) {
    if snapshots.is_empty() {
        println!("No snapshots recorded.");
        return;
    }

    for snapshot in snapshots {
        let end = snapshot
            .end_time
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{} - {}] score {:.1} ({}) | blinks {} yawns {} gaze {} expr {} | typing {:.0} cpm, {} backspaces, {} errors | {} samples",
            snapshot.start_time.format("%H:%M:%S"),
            end,
            snapshot.cognitive_score,
            snapshot.overload_label,
            snapshot.blink_count,
            snapshot.yawn_count,
            snapshot.gaze_direction,
            snapshot.current_expression,
            snapshot.typing_speed,
            snapshot.backspace_count,
            snapshot.error_count,
            snapshot.sample_count,
        );
    }
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
