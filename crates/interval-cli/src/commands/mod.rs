pub mod config;
pub mod run;
pub mod simulate;

use clap::Args;
use interval_core::{Config, IntervalLength, Theme, TimerConfiguration, TimerEngine};

/// Workout settings that override the config file defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkoutArgs {
    /// Work interval length (M:SS or seconds)
    #[arg(long)]
    pub work: Option<IntervalLength>,
    /// Rest interval length (M:SS or seconds); 0 means no rest
    #[arg(long)]
    pub rest: Option<IntervalLength>,
    /// Number of repetitions (1-20)
    #[arg(long)]
    pub reps: Option<i64>,
    /// Display theme
    #[arg(long)]
    pub theme: Option<Theme>,
    /// Start with audio cues muted
    #[arg(long)]
    pub muted: bool,
}

impl WorkoutArgs {
    pub fn configuration(&self, config: &Config) -> TimerConfiguration {
        let base = config.timer_configuration();
        TimerConfiguration::new(
            self.work.unwrap_or(base.work),
            self.rest.unwrap_or(base.rest),
            self.reps.unwrap_or_else(|| i64::from(base.total_repetitions())),
        )
        .with_theme(self.theme.unwrap_or(base.theme))
    }

    pub fn build_engine(&self, config: &Config) -> TimerEngine {
        TimerEngine::with_muted(
            self.configuration(config),
            config.engine_settings(),
            self.muted || config.defaults.muted,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let config = Config::default();
        let args = WorkoutArgs {
            rest: Some(IntervalLength::ZERO),
            reps: Some(30),
            ..WorkoutArgs::default()
        };
        let timer = args.configuration(&config);
        assert_eq!(timer.work, IntervalLength::new(0, 40));
        assert!(timer.rest.is_zero());
        assert_eq!(timer.total_repetitions(), 20);
    }

    #[test]
    fn muted_from_either_source() {
        let mut config = Config::default();
        config.defaults.muted = true;
        let engine = WorkoutArgs::default().build_engine(&config);
        assert!(engine.state().is_muted());
    }
}
