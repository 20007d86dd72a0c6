use std::io::Write;

use interval_core::{Config, Effect, TimerEngine};
use serde_json::json;

use super::WorkoutArgs;

/// Drive the engine without a clock: one JSON line for the start, then one
/// per tick until the workout completes or `max_ticks` is reached.
pub fn run(workout: WorkoutArgs, max_ticks: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = workout.build_engine(&config);
    let mut out = std::io::stdout().lock();

    let effects = engine.start();
    emit(&mut out, 0, &engine, &effects)?;

    for tick in 1..=max_ticks {
        if !engine.state().is_running() {
            break;
        }
        let effects = engine.tick();
        emit(&mut out, tick, &engine, &effects)?;
        if effects.iter().any(|e| matches!(e, Effect::Completed { .. })) {
            break;
        }
    }
    Ok(())
}

fn emit(
    out: &mut impl Write,
    tick: usize,
    engine: &TimerEngine,
    effects: &[Effect],
) -> Result<(), Box<dyn std::error::Error>> {
    let line = json!({
        "tick": tick,
        "phase": engine.state().phase(),
        "state": engine.state(),
        "effects": effects,
    });
    writeln!(out, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use interval_core::{EngineSettings, IntervalLength, TimerConfiguration};

    #[test]
    fn emitted_line_is_json() {
        let mut engine = TimerEngine::new(
            TimerConfiguration::new(IntervalLength::new(0, 3), IntervalLength::ZERO, 1),
            EngineSettings::default(),
        );
        let effects = engine.start();
        let mut buf = Vec::new();
        emit(&mut buf, 0, &engine, &effects).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["phase"], "working");
        assert_eq!(value["effects"][1]["type"], "start_ticking");
        assert_eq!(value["state"]["remaining"]["seconds"], 3);
    }
}
