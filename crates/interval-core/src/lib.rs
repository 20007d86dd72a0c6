//! # Interval Timer Core Library
//!
//! This library provides the business logic for an interval workout timer:
//! work intervals, rest intervals and a repetition count, with audio cues
//! at every transition. Front ends (the bundled CLI, or any GUI) read state
//! snapshots and send commands; they hold no timer logic of their own.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine. Each `tick()` advances the
//!   countdown by one second and returns the side effects to perform.
//! - **Timer Service**: a tokio task that owns the engine, drives the 1 Hz
//!   tick and executes effects against the injected ports.
//! - **Ports**: `AudioCue` and `Notifier` traits for sound and toasts.
//! - **Storage**: TOML-based configuration for start-up defaults.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`TimerService`] / [`TimerHandle`]: async owner and its command API
//! - [`TimerState`]: read-only snapshot for presentation
//! - [`Config`]: application configuration management

pub mod effects;
pub mod error;
pub mod ports;
pub mod service;
pub mod storage;
pub mod timer;

pub use effects::{Cue, Effect, Notification};
pub use error::{ConfigError, CoreError, CueError};
pub use ports::{AudioCue, Notifier};
pub use service::{EditField, TimerHandle, TimerService};
pub use storage::Config;
pub use timer::{
    EngineSettings, IntervalLength, Phase, ResetValues, RunState, Theme, TimerConfiguration,
    TimerEngine, TimerState,
};
