use serde::{Deserialize, Serialize};

/// Which audio cue to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Start,
    End,
}

/// A toast shown to the user. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_ms: u64,
}

/// Every state change in the engine produces zero or more effects.
/// The engine never performs them itself; the service executes them after
/// the transition has been applied, and broadcasts them to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Play a cue right away.
    PlayCue { cue: Cue },
    /// Play a cue after the audio warm-up delay.
    PlayCueDelayed { cue: Cue },
    Notify(Notification),
    /// Arm the tick source, replacing any armed one.
    StartTicking,
    /// Disarm the tick source.
    StopTicking,
    /// Forward the mute flag to the audio port.
    SetMuted { muted: bool },
    /// The last interval of the workout finished.
    Completed { repetitions: u32 },
}

impl Effect {
    pub fn is_cue(&self, wanted: Cue) -> bool {
        matches!(self, Effect::PlayCue { cue } | Effect::PlayCueDelayed { cue } if *cue == wanted)
    }
}
