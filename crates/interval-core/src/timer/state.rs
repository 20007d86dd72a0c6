use serde::{Deserialize, Serialize};

use super::config::{IntervalLength, TimerConfiguration};

/// Exactly one of these holds at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Where the workout is, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Working,
    Resting,
    Paused,
}

/// Configuration plus runtime state, as one consistent snapshot.
///
/// Fields are read-only from outside the crate. `TimerEngine` is the only
/// writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    pub(crate) config: TimerConfiguration,
    pub(crate) remaining: IntervalLength,
    pub(crate) current_repetition: u32,
    pub(crate) is_resting: bool,
    pub(crate) run_state: RunState,
    pub(crate) is_muted: bool,
}

impl TimerState {
    pub(crate) fn new(config: TimerConfiguration, muted: bool) -> Self {
        Self {
            config,
            remaining: config.work,
            current_repetition: 1,
            is_resting: false,
            run_state: RunState::Idle,
            is_muted: muted,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    pub fn remaining(&self) -> IntervalLength {
        self.remaining
    }

    pub fn current_repetition(&self) -> u32 {
        self.current_repetition
    }

    pub fn total_repetitions(&self) -> u32 {
        self.config.total_repetitions()
    }

    pub fn is_resting(&self) -> bool {
        self.is_resting
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    pub fn is_idle(&self) -> bool {
        self.run_state == RunState::Idle
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn phase(&self) -> Phase {
        match self.run_state {
            RunState::Idle => Phase::Idle,
            RunState::Paused => Phase::Paused,
            RunState::Running if self.is_resting => Phase::Resting,
            RunState::Running => Phase::Working,
        }
    }

    /// Length of the whole workout: every work interval plus the rests
    /// between them (no rest after the last repetition).
    pub fn total_workout_secs(&self) -> u64 {
        let reps = u64::from(self.config.total_repetitions());
        let work = self.config.work.total_secs();
        let rest = self.config.rest.total_secs();
        reps * work + reps.saturating_sub(1) * rest
    }

    pub fn elapsed_workout_secs(&self) -> u64 {
        if self.is_idle() {
            return 0;
        }
        let work = self.config.work.total_secs();
        let rest = self.config.rest.total_secs();
        let done_reps = u64::from(self.current_repetition.saturating_sub(1));
        let remaining = self.remaining.total_secs();
        let in_current = if self.is_resting {
            work + rest.saturating_sub(remaining)
        } else {
            work.saturating_sub(remaining)
        };
        done_reps * (work + rest) + in_current
    }

    /// 0.0 .. 100.0 progress across the entire workout.
    pub fn workout_progress_pct(&self) -> f64 {
        let total = self.total_workout_secs();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_workout_secs() as f64 / total as f64 * 100.0).min(100.0)
    }
}
