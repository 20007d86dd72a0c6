//! Tick-driven timer service.
//!
//! [`TimerService`] is a single tokio task that owns the [`TimerEngine`].
//! Commands from any number of [`TimerHandle`]s, the 1 Hz tick, the edit
//! debounce deadline and the delayed start cue are all serialized through one
//! `select!` loop, so the engine is never touched concurrently and no lock
//! guards it.
//!
//! The service holds at most one tick interval. Starting replaces it,
//! pausing or resetting drops it. Because commands are polled before ticks,
//! a reset that is already queued always lands before a tick due at the same
//! instant.

use std::future::pending;
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::effects::{Cue, Effect};
use crate::error::{CoreError, Result};
use crate::ports::{AudioCue, Notifier};
use crate::timer::{ResetValues, Theme, TimerEngine, TimerState};

const EFFECT_CHANNEL_CAPACITY: usize = 64;

/// Debounced configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    WorkMinutes,
    WorkSeconds,
    RestMinutes,
    RestSeconds,
}

impl EditField {
    const ORDER: [EditField; 4] = [
        EditField::WorkMinutes,
        EditField::WorkSeconds,
        EditField::RestMinutes,
        EditField::RestSeconds,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

enum Command {
    Start(oneshot::Sender<TimerState>),
    Pause(oneshot::Sender<TimerState>),
    Reset(oneshot::Sender<ResetValues>),
    Edit {
        field: EditField,
        value: i64,
        ack: oneshot::Sender<()>,
    },
    SetRepetitions(i64, oneshot::Sender<TimerState>),
    SetTheme(Theme, oneshot::Sender<TimerState>),
    ToggleMute(oneshot::Sender<TimerState>),
    Shutdown(oneshot::Sender<()>),
}

/// Latest value per field, written once the burst goes quiet.
#[derive(Debug, Default)]
struct PendingEdits {
    values: [Option<i64>; 4],
    deadline: Option<Instant>,
}

impl PendingEdits {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct TimerService {
    engine: TimerEngine,
    audio: Arc<dyn AudioCue>,
    notifier: Arc<dyn Notifier>,
    commands: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<TimerState>,
    effects_tx: broadcast::Sender<Effect>,
    ticker: Option<Interval>,
    edits: PendingEdits,
    start_cue_at: Option<Instant>,
}

impl TimerService {
    /// Spawn the service on the current tokio runtime.
    pub fn spawn(
        engine: TimerEngine,
        audio: Arc<dyn AudioCue>,
        notifier: Arc<dyn Notifier>,
    ) -> TimerHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(engine.state().clone());
        let (effects_tx, _) = broadcast::channel(EFFECT_CHANNEL_CAPACITY);

        if let Err(err) = audio.set_muted(engine.state().is_muted()) {
            warn!(%err, "failed to apply initial mute state");
        }

        let service = TimerService {
            engine,
            audio,
            notifier,
            commands: cmd_rx,
            state_tx,
            effects_tx: effects_tx.clone(),
            ticker: None,
            edits: PendingEdits::default(),
            start_cue_at: None,
        };
        tokio::spawn(service.run());

        TimerHandle {
            commands: cmd_tx,
            state: state_rx,
            effects: effects_tx,
        }
    }

    async fn run(mut self) {
        debug!("timer service started");
        let mut shutdown_ack = None;
        loop {
            tokio::select! {
                biased;
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => {
                        if let ControlFlow::Break(ack) = self.handle(cmd) {
                            shutdown_ack = Some(ack);
                            break;
                        }
                    }
                    None => break,
                },
                _ = next_tick(&mut self.ticker) => {
                    let effects = self.engine.tick();
                    self.apply(effects);
                }
                _ = sleep_until_opt(self.edits.deadline) => self.flush_edits(),
                _ = sleep_until_opt(self.start_cue_at) => {
                    self.start_cue_at = None;
                    if !self.engine.state().is_muted() {
                        self.play(Cue::Start);
                    }
                }
            }
        }
        self.ticker = None;
        info!("timer service stopped");
        if let Some(ack) = shutdown_ack {
            let _ = ack.send(());
        }
    }

    fn handle(&mut self, cmd: Command) -> ControlFlow<oneshot::Sender<()>> {
        match cmd {
            Command::Start(reply) => {
                // Edits still inside their debounce window belong to this workout.
                self.flush_edits();
                let effects = self.engine.start();
                self.apply(effects);
                let _ = reply.send(self.engine.state().clone());
            }
            Command::Pause(reply) => {
                let effects = self.engine.pause();
                self.apply(effects);
                let _ = reply.send(self.engine.state().clone());
            }
            Command::Reset(reply) => {
                let (values, effects) = self.engine.reset(now());
                if !effects.is_empty() {
                    self.edits.clear();
                }
                self.apply(effects);
                let _ = reply.send(values);
            }
            Command::Edit { field, value, ack } => {
                if self.engine.state().is_idle() {
                    self.edits.values[field.slot()] = Some(value);
                    self.edits.deadline = Some(Instant::now() + self.engine.settings().edit_debounce);
                } else {
                    debug!(?field, "edit ignored: timer is not idle");
                }
                let _ = ack.send(());
            }
            Command::SetRepetitions(value, reply) => {
                self.engine.set_total_repetitions(value);
                self.publish();
                let _ = reply.send(self.engine.state().clone());
            }
            Command::SetTheme(theme, reply) => {
                self.engine.set_theme(theme);
                self.publish();
                let _ = reply.send(self.engine.state().clone());
            }
            Command::ToggleMute(reply) => {
                let effects = self.engine.toggle_mute(now());
                self.apply(effects);
                let _ = reply.send(self.engine.state().clone());
            }
            Command::Shutdown(ack) => return ControlFlow::Break(ack),
        }
        ControlFlow::Continue(())
    }

    fn flush_edits(&mut self) {
        let edits = std::mem::take(&mut self.edits);
        if edits.deadline.is_none() {
            return;
        }
        for field in EditField::ORDER {
            let Some(value) = edits.values[field.slot()] else {
                continue;
            };
            let applied = match field {
                EditField::WorkMinutes => self.engine.set_work_minutes(value),
                EditField::WorkSeconds => self.engine.set_work_seconds(value),
                EditField::RestMinutes => self.engine.set_rest_minutes(value),
                EditField::RestSeconds => self.engine.set_rest_seconds(value),
            };
            debug!(?field, value, applied, "edit flushed");
        }
        self.publish();
    }

    /// Publish the new state, then perform the side effects the transition
    /// asked for.
    fn apply(&mut self, effects: Vec<Effect>) {
        self.publish();
        for effect in effects {
            match &effect {
                Effect::PlayCue { cue } => self.play(*cue),
                Effect::PlayCueDelayed { cue: Cue::Start } => {
                    self.start_cue_at = Some(Instant::now() + self.engine.settings().start_cue_delay);
                }
                Effect::PlayCueDelayed { cue } => self.play(*cue),
                Effect::Notify(notification) => self.notifier.notify(notification),
                Effect::StartTicking => self.arm_ticker(),
                Effect::StopTicking => {
                    // A pending warm-up cue belongs to the run that just stopped.
                    self.ticker = None;
                    self.start_cue_at = None;
                }
                Effect::SetMuted { muted } => {
                    if let Err(err) = self.audio.set_muted(*muted) {
                        warn!(%err, muted, "failed to forward mute state");
                    }
                }
                Effect::Completed { .. } => {}
            }
            // No subscribers is fine.
            let _ = self.effects_tx.send(effect);
        }
    }

    fn arm_ticker(&mut self) {
        let period = self.engine.settings().tick_period;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn play(&self, cue: Cue) {
        if let Err(err) = self.audio.play(cue) {
            warn!(%err, ?cue, "audio cue failed");
        }
    }

    fn publish(&self) {
        let current = self.engine.state();
        self.state_tx.send_if_modified(|shown| {
            if shown != current {
                *shown = current.clone();
                true
            } else {
                false
            }
        });
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending::<()>().await,
    }
}

/// Cloneable front end to a running [`TimerService`].
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<TimerState>,
    effects: broadcast::Sender<Effect>,
}

impl TimerHandle {
    pub async fn start(&self) -> Result<TimerState> {
        self.request(Command::Start).await
    }

    pub async fn pause(&self) -> Result<TimerState> {
        self.request(Command::Pause).await
    }

    /// Returns the field values after the reset, or the unchanged current
    /// values when the reset was debounced.
    pub async fn reset(&self) -> Result<ResetValues> {
        self.request(Command::Reset).await
    }

    pub async fn toggle_mute(&self) -> Result<TimerState> {
        self.request(Command::ToggleMute).await
    }

    pub async fn set_total_repetitions(&self, value: i64) -> Result<TimerState> {
        self.request(|reply| Command::SetRepetitions(value, reply)).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<TimerState> {
        self.request(|reply| Command::SetTheme(theme, reply)).await
    }

    /// Queue a debounced edit. Resolves once the service has accepted the
    /// request, not when the value is written.
    pub async fn edit(&self, field: EditField, value: i64) -> Result<()> {
        self.request(|ack| Command::Edit { field, value, ack }).await
    }

    pub async fn set_work_minutes(&self, value: i64) -> Result<()> {
        self.edit(EditField::WorkMinutes, value).await
    }

    pub async fn set_work_seconds(&self, value: i64) -> Result<()> {
        self.edit(EditField::WorkSeconds, value).await
    }

    pub async fn set_rest_minutes(&self, value: i64) -> Result<()> {
        self.edit(EditField::RestMinutes, value).await
    }

    pub async fn set_rest_seconds(&self, value: i64) -> Result<()> {
        self.edit(EditField::RestSeconds, value).await
    }

    /// Stop the service and its tick source.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(Command::Shutdown).await
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Effect> {
        self.effects.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .map_err(|_| CoreError::ServiceStopped)?;
        rx.await.map_err(|_| CoreError::ServiceStopped)
    }
}
