//! Capabilities the timer consumes from the outside world.
//!
//! Both ports are fire-and-forget: the service never waits on them and a
//! failing call never changes the countdown.

use crate::effects::{Cue, Notification};
use crate::error::CueError;

/// Plays the short start/end sounds.
pub trait AudioCue: Send + Sync {
    fn play_start(&self) -> Result<(), CueError>;

    fn play_end(&self) -> Result<(), CueError>;

    /// Called whenever the user toggles mute.
    fn set_muted(&self, _muted: bool) -> Result<(), CueError> {
        Ok(()) // default no-op
    }

    fn play(&self, cue: Cue) -> Result<(), CueError> {
        match cue {
            Cue::Start => self.play_start(),
            Cue::End => self.play_end(),
        }
    }
}

/// Shows transient toasts ("Rest period", "Workout completed", ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
