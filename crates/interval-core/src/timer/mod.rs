mod config;
mod debounce;
mod engine;
mod state;

pub use config::{
    IntervalLength, Theme, TimerConfiguration, MAX_MINUTES, MAX_REPETITIONS, MAX_SECONDS,
    MIN_REPETITIONS,
};
pub use debounce::Debounce;
pub use engine::{EngineSettings, ResetValues, TimerEngine};
pub use state::{Phase, RunState, TimerState};
