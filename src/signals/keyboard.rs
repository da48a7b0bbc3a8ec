//! Typing cadence metrics from a keystroke event stream.
//!
//! The OS-level keystroke hook is a collaborator behind
//! [`KeystrokeSource`]; the bundled implementation drains a crossbeam
//! channel that a platform listener (or a test) feeds.

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::signals::{KeyEvent, KeyKind, SignalError};

/// Keystroke capture collaborator.
///
/// The source owns its own background listener; this crate only starts
/// it, drains its events and stops it.
pub trait KeystrokeSource: Send {
    /// Begin capturing. Called during session start; failure aborts the
    /// session before it enters Running.
    fn start(&mut self) -> Result<(), SignalError>;

    /// Drain all events captured since the last poll.
    fn poll(&mut self) -> Vec<KeyEvent>;

    /// Stop capturing and release listener resources.
    fn stop(&mut self);
}

/// A keystroke source backed by a crossbeam channel.
pub struct ChannelKeystrokes {
    receiver: Receiver<KeyEvent>,
    running: bool,
}

/// Cloneable sending half for [`ChannelKeystrokes`], handed to whatever
/// feeds the channel (a platform listener, a demo script, a test).
#[derive(Clone)]
pub struct KeystrokeFeed {
    sender: Sender<KeyEvent>,
}

impl ChannelKeystrokes {
    /// Create a source and its paired feed.
    pub fn pair() -> (Self, KeystrokeFeed) {
        let (sender, receiver) = bounded(10_000);
        (
            Self {
                receiver,
                running: false,
            },
            KeystrokeFeed { sender },
        )
    }
}

impl KeystrokeSource for ChannelKeystrokes {
    fn start(&mut self) -> Result<(), SignalError> {
        self.running = true;
        Ok(())
    }

    fn poll(&mut self) -> Vec<KeyEvent> {
        if !self.running {
            return Vec::new();
        }
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

impl KeystrokeFeed {
    /// Send a keystroke stamped with the current time. Returns false if
    /// the channel is full or disconnected.
    pub fn press(&self, kind: KeyKind) -> bool {
        self.send(KeyEvent::now(kind))
    }

    pub fn send(&self, event: KeyEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }
}

/// Per-second keyboard metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardMetrics {
    /// Chars/minute over the window so far
    pub typing_speed: f64,
    /// Backspaces since the previous analyze call
    pub backspace_count: u32,
    /// Detected correction errors since the previous analyze call
    pub error_count: u32,
}

/// Stateful typing cadence analyzer.
pub struct KeyboardSignal {
    window_started: DateTime<Utc>,
    printable_in_window: u32,
    pending_backspaces: u32,
    pending_errors: u32,
}

impl KeyboardSignal {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            window_started: now,
            printable_in_window: 0,
            pending_backspaces: 0,
            pending_errors: 0,
        }
    }

    /// Feed one keystroke event.
    pub fn record(&mut self, event: &KeyEvent) {
        match event.kind {
            KeyKind::Printable => self.printable_in_window += 1,
            KeyKind::Backspace => self.pending_backspaces += 1,
            // No correction rule is defined yet, so error counts stay at
            // zero until one lands.
            KeyKind::Quit | KeyKind::Other => {}
        }
    }

    /// Compute this second's metrics.
    ///
    /// Typing speed is chars/minute over the window so far; backspace and
    /// error counts are deltas since the previous call, so summing them
    /// over a window yields window-local totals.
    pub fn analyze(&mut self, now: DateTime<Utc>) -> KeyboardMetrics {
        let elapsed_secs = (now - self.window_started).num_milliseconds() as f64 / 1000.0;
        let typing_speed = if elapsed_secs <= 0.0 {
            0.0
        } else {
            self.printable_in_window as f64 / elapsed_secs * 60.0
        };

        let metrics = KeyboardMetrics {
            typing_speed,
            backspace_count: self.pending_backspaces,
            error_count: self.pending_errors,
        };
        self.pending_backspaces = 0;
        self.pending_errors = 0;
        metrics
    }

    /// Zero window-local counters after a window close.
    pub fn reset_window(&mut self, now: DateTime<Utc>) {
        self.printable_in_window = 0;
        self.window_started = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn key_at(base: DateTime<Utc>, offset_secs: i64, kind: KeyKind) -> KeyEvent {
        KeyEvent {
            at: base + Duration::seconds(offset_secs),
            kind,
        }
    }

    #[test]
    fn test_typing_speed_is_chars_per_minute() {
        let start = Utc::now();
        let mut keyboard = KeyboardSignal::new(start);

        for i in 0..10 {
            keyboard.record(&key_at(start, i, KeyKind::Printable));
        }

        let metrics = keyboard.analyze(start + Duration::seconds(5));
        assert!((metrics.typing_speed - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_backspaces_are_deltas() {
        let start = Utc::now();
        let mut keyboard = KeyboardSignal::new(start);

        keyboard.record(&key_at(start, 0, KeyKind::Backspace));
        keyboard.record(&key_at(start, 0, KeyKind::Backspace));

        let first = keyboard.analyze(start + Duration::seconds(1));
        assert_eq!(first.backspace_count, 2);

        let second = keyboard.analyze(start + Duration::seconds(2));
        assert_eq!(second.backspace_count, 0);
    }

    #[test]
    fn test_window_reset_zeroes_speed_basis() {
        let start = Utc::now();
        let mut keyboard = KeyboardSignal::new(start);

        for i in 0..60 {
            keyboard.record(&key_at(start, i, KeyKind::Printable));
        }
        keyboard.analyze(start + Duration::seconds(30));

        let window_two = start + Duration::seconds(60);
        keyboard.reset_window(window_two);
        let metrics = keyboard.analyze(window_two + Duration::seconds(10));
        assert_eq!(metrics.typing_speed, 0.0);
    }

    #[test]
    fn test_channel_source_drains() {
        let (mut source, feed) = ChannelKeystrokes::pair();
        source.start().unwrap();

        assert!(feed.press(KeyKind::Printable));
        assert!(feed.press(KeyKind::Backspace));

        let events = source.poll();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, KeyKind::Printable);
        assert!(source.poll().is_empty());

        source.stop();
        feed.press(KeyKind::Printable);
        assert!(source.poll().is_empty());
    }
}
