//! Countdown engine.
//!
//! The engine is a pure state machine. It does not own a clock or any
//! threads: the caller feeds it one `tick()` per second while it is running
//! and executes the [`Effect`]s each call returns.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Working <-> Resting -> (Completed) -> Idle
//!           |            |
//!           +-> Paused <-+
//! ```
//!
//! ## Usage
//!
//! ```
//! use interval_core::{TimerEngine, TimerConfiguration, EngineSettings};
//!
//! let mut engine = TimerEngine::new(TimerConfiguration::default(), EngineSettings::default());
//! let effects = engine.start();
//! assert!(engine.state().is_running());
//! # let _ = effects;
//! // Once per second:
//! let _effects = engine.tick();
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::{IntervalLength, Theme, TimerConfiguration};
use super::debounce::Debounce;
use super::state::{RunState, TimerState};
use crate::effects::{Cue, Effect, Notification};

/// Timing knobs shared by the engine and the service that drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub tick_period: Duration,
    pub edit_debounce: Duration,
    pub reset_debounce: Duration,
    pub mute_debounce: Duration,
    pub start_cue_delay: Duration,
    pub notifications_enabled: bool,
    pub notification_duration_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(1000),
            edit_debounce: Duration::from_millis(50),
            reset_debounce: Duration::from_millis(5000),
            mute_debounce: Duration::from_millis(1000),
            start_cue_delay: Duration::from_millis(100),
            notifications_enabled: true,
            notification_duration_ms: 3000,
        }
    }
}

/// Field values handed back by `reset()` so callers can resync any input
/// buffers they keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetValues {
    pub minutes: u32,
    pub seconds: u32,
    pub rest_minutes: u32,
    pub rest_seconds: u32,
}

/// Work and rest lengths captured on a fresh start. Repetitions restart
/// from this, never from whatever the countdown currently shows.
#[derive(Debug, Clone, Copy)]
struct Captured {
    work: IntervalLength,
    rest: IntervalLength,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    captured: Option<Captured>,
    settings: EngineSettings,
    reset_debounce: Debounce,
    mute_debounce: Debounce,
}

impl TimerEngine {
    /// Create an idle engine with the countdown showing the work length.
    pub fn new(config: TimerConfiguration, settings: EngineSettings) -> Self {
        Self::with_muted(config, settings, false)
    }

    pub fn with_muted(config: TimerConfiguration, settings: EngineSettings, muted: bool) -> Self {
        Self {
            state: TimerState::new(config, muted),
            captured: None,
            reset_debounce: Debounce::new(settings.reset_debounce),
            mute_debounce: Debounce::new(settings.mute_debounce),
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh workout, or resume a paused one.
    ///
    /// A fresh start needs time on the clock. Resume is always allowed, even
    /// at `00:00`, so a workout paused right on a boundary can continue.
    pub fn start(&mut self) -> Vec<Effect> {
        match self.state.run_state {
            RunState::Running => {
                debug!("start ignored: already running");
                Vec::new()
            }
            RunState::Paused => {
                self.state.run_state = RunState::Running;
                info!(remaining = %self.state.remaining, "timer resumed");
                vec![Effect::StartTicking]
            }
            RunState::Idle => {
                if self.state.remaining.is_zero() {
                    debug!("start ignored: nothing on the clock");
                    return Vec::new();
                }
                self.captured = Some(Captured {
                    work: self.state.remaining,
                    rest: self.state.config.rest,
                });
                self.state.run_state = RunState::Running;
                self.state.is_resting = false;
                info!(
                    work = %self.state.remaining,
                    rest = %self.state.config.rest,
                    repetitions = self.state.total_repetitions(),
                    "workout started"
                );
                let mut effects = Vec::with_capacity(2);
                if !self.state.is_muted {
                    effects.push(Effect::PlayCueDelayed { cue: Cue::Start });
                }
                effects.push(Effect::StartTicking);
                effects
            }
        }
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        if self.state.run_state != RunState::Running {
            debug!("pause ignored: not running");
            return Vec::new();
        }
        self.state.run_state = RunState::Paused;
        info!(remaining = %self.state.remaining, "timer paused");
        vec![Effect::StopTicking]
    }

    /// Return to a blank, editable timer.
    ///
    /// Requests closer together than the reset debounce window are ignored
    /// and report the current values unchanged.
    pub fn reset(&mut self, now: Instant) -> (ResetValues, Vec<Effect>) {
        if !self.reset_debounce.try_accept(now) {
            debug!("reset ignored: inside debounce window");
            return (self.reset_values(), Vec::new());
        }
        self.clear();
        info!("timer reset");
        (self.reset_values(), vec![Effect::StopTicking])
    }

    /// Advance the countdown by one second. Does nothing unless running.
    pub fn tick(&mut self) -> Vec<Effect> {
        if self.state.run_state != RunState::Running {
            return Vec::new();
        }
        if let Some(next) = self.state.remaining.decrement() {
            self.state.remaining = next;
            return Vec::new();
        }
        self.on_boundary()
    }

    pub fn toggle_mute(&mut self, now: Instant) -> Vec<Effect> {
        if !self.mute_debounce.try_accept(now) {
            debug!("mute toggle ignored: inside debounce window");
            return Vec::new();
        }
        self.state.is_muted = !self.state.is_muted;
        info!(muted = self.state.is_muted, "mute toggled");
        vec![Effect::SetMuted {
            muted: self.state.is_muted,
        }]
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.config.theme = theme;
    }

    // ── Configuration edits (idle only) ──────────────────────────────

    /// Returns `false` when the edit was rejected because the timer is
    /// running or paused.
    pub fn set_work_minutes(&mut self, value: i64) -> bool {
        self.edit_work(|len| len.with_minutes(value))
    }

    pub fn set_work_seconds(&mut self, value: i64) -> bool {
        self.edit_work(|len| len.with_seconds(value))
    }

    pub fn set_rest_minutes(&mut self, value: i64) -> bool {
        self.edit_rest(|len| len.with_minutes(value))
    }

    pub fn set_rest_seconds(&mut self, value: i64) -> bool {
        self.edit_rest(|len| len.with_seconds(value))
    }

    pub fn set_total_repetitions(&mut self, value: i64) -> bool {
        if !self.editable("repetitions") {
            return false;
        }
        self.state.config.set_total_repetitions(value);
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn editable(&self, field: &str) -> bool {
        if self.state.is_idle() {
            true
        } else {
            debug!(field, "edit ignored: timer is not idle");
            false
        }
    }

    fn edit_work(&mut self, f: impl FnOnce(IntervalLength) -> IntervalLength) -> bool {
        if !self.editable("work") {
            return false;
        }
        let work = f(self.state.config.work);
        self.state.config.work = work;
        self.state.remaining = work;
        true
    }

    fn edit_rest(&mut self, f: impl FnOnce(IntervalLength) -> IntervalLength) -> bool {
        if !self.editable("rest") {
            return false;
        }
        self.state.config.rest = f(self.state.config.rest);
        true
    }

    fn reset_values(&self) -> ResetValues {
        ResetValues {
            minutes: self.state.remaining.minutes(),
            seconds: self.state.remaining.seconds(),
            rest_minutes: self.state.config.rest.minutes(),
            rest_seconds: self.state.config.rest.seconds(),
        }
    }

    fn clear(&mut self) {
        self.state.run_state = RunState::Idle;
        self.state.is_resting = false;
        self.state.current_repetition = 1;
        self.state.remaining = IntervalLength::ZERO;
        self.state.config.work = IntervalLength::ZERO;
        self.state.config.rest = IntervalLength::ZERO;
        self.captured = None;
    }

    fn on_boundary(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_muted {
            effects.push(Effect::PlayCue { cue: Cue::End });
        }

        let captured = self.captured.unwrap_or(Captured {
            work: self.state.config.work,
            rest: self.state.config.rest,
        });
        let total = self.state.total_repetitions();
        if self.state.current_repetition >= total {
            self.complete(total, &mut effects);
            return effects;
        }

        if self.state.is_resting || captured.rest.is_zero() {
            self.begin_repetition(captured.work, &mut effects);
        } else {
            self.state.is_resting = true;
            self.state.remaining = captured.rest;
            info!(
                repetition = self.state.current_repetition,
                rest = %captured.rest,
                "rest started"
            );
            self.notify(
                &mut effects,
                "Rest period",
                Some(format!(
                    "Rest for {} before repetition {} of {}",
                    captured.rest,
                    self.state.current_repetition + 1,
                    total
                )),
            );
        }
        effects
    }

    fn begin_repetition(&mut self, work: IntervalLength, effects: &mut Vec<Effect>) {
        self.state.current_repetition += 1;
        self.state.is_resting = false;
        self.state.remaining = work;
        let (n, m) = (self.state.current_repetition, self.state.total_repetitions());
        info!(repetition = n, of = m, "repetition started");
        if !self.state.is_muted {
            effects.push(Effect::PlayCue { cue: Cue::Start });
        }
        self.notify(
            effects,
            &format!("Starting repetition {n} of {m}"),
            Some(format!("Work for {work}")),
        );
    }

    fn complete(&mut self, repetitions: u32, effects: &mut Vec<Effect>) {
        self.clear();
        info!(repetitions, "workout completed");
        effects.push(Effect::StopTicking);
        self.notify(
            effects,
            "Workout completed",
            Some(format!("All {repetitions} repetitions done")),
        );
        effects.push(Effect::Completed { repetitions });
    }

    fn notify(&self, effects: &mut Vec<Effect>, title: &str, description: Option<String>) {
        if !self.settings.notifications_enabled {
            return;
        }
        effects.push(Effect::Notify(Notification {
            title: title.to_string(),
            description,
            duration_ms: self.settings.notification_duration_ms,
        }));
    }
}
