//! Terminal implementations of the audio and notification ports.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use interval_core::{AudioCue, CueError, Notification, Notifier, TimerState};

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell: once for a start cue, twice for an end cue.
#[derive(Debug, Default)]
pub struct TerminalBell {
    muted: AtomicBool,
}

impl TerminalBell {
    fn ring(&self, times: usize) -> Result<(), CueError> {
        if self.muted.load(Ordering::Relaxed) {
            return Ok(());
        }
        let mut err = std::io::stderr().lock();
        for _ in 0..times {
            err.write_all(BELL)
                .map_err(|e| CueError::Playback(e.to_string()))?;
        }
        err.flush().map_err(|e| CueError::Playback(e.to_string()))
    }
}

impl AudioCue for TerminalBell {
    fn play_start(&self) -> Result<(), CueError> {
        self.ring(1)
    }

    fn play_end(&self) -> Result<(), CueError> {
        self.ring(2)
    }

    fn set_muted(&self, muted: bool) -> Result<(), CueError> {
        self.muted.store(muted, Ordering::Relaxed);
        Ok(())
    }
}

/// Prints notifications as timestamped lines on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        println!("{}", format_notification(notification, &Local::now().format("%H:%M:%S").to_string()));
    }
}

fn format_notification(notification: &Notification, at: &str) -> String {
    match &notification.description {
        Some(description) => format!("[{at}] {}: {description}", notification.title),
        None => format!("[{at}] {}", notification.title),
    }
}

/// One status line for the countdown display.
pub fn status_line(state: &TimerState) -> String {
    let phase = format!("{:?}", state.phase()).to_lowercase();
    format!(
        "{phase:<8} {}  rep {}/{}  {:>3.0}%{}",
        state.remaining(),
        state.current_repetition(),
        state.total_repetitions(),
        state.workout_progress_pct(),
        if state.is_muted() { "  (muted)" } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use interval_core::{EngineSettings, TimerConfiguration, TimerEngine};

    #[test]
    fn notification_lines() {
        let with = Notification {
            title: "Rest period".into(),
            description: Some("Rest for 01:00".into()),
            duration_ms: 3000,
        };
        assert_eq!(
            format_notification(&with, "10:00:00"),
            "[10:00:00] Rest period: Rest for 01:00"
        );
        let without = Notification {
            description: None,
            ..with
        };
        assert_eq!(format_notification(&without, "10:00:00"), "[10:00:00] Rest period");
    }

    #[test]
    fn status_line_shows_countdown() {
        let mut engine = TimerEngine::new(TimerConfiguration::default(), EngineSettings::default());
        engine.start();
        engine.tick();
        let line = status_line(engine.state());
        assert!(line.starts_with("working  00:39  rep 1/3"), "{line}");
    }

    #[test]
    fn muted_bell_stays_quiet() {
        let bell = TerminalBell::default();
        bell.set_muted(true).unwrap();
        assert!(bell.play_end().is_ok());
    }
}
