//! Integration tests for full workouts driven tick by tick.
//!
//! An N-second interval takes N ticks to reach 00:00 and one more tick to
//! cross the boundary.

use std::time::{Duration, Instant};

use interval_core::{
    Cue, Effect, EngineSettings, IntervalLength, Phase, ResetValues, TimerConfiguration,
    TimerEngine,
};

fn engine(work: (i64, i64), rest: (i64, i64), reps: i64) -> TimerEngine {
    TimerEngine::new(
        TimerConfiguration::new(
            IntervalLength::new(work.0, work.1),
            IntervalLength::new(rest.0, rest.1),
            reps,
        ),
        EngineSettings::default(),
    )
}

fn tick_n(engine: &mut TimerEngine, n: usize) -> Vec<Effect> {
    (0..n).flat_map(|_| engine.tick()).collect()
}

fn end_cues(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| e.is_cue(Cue::End)).count()
}

fn titles(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notify(n) => Some(n.title.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn work_rest_work_then_complete() {
    // work 0:05, rest 0:03, 2 repetitions
    let mut e = engine((0, 5), (0, 3), 2);
    e.start();

    let effects = tick_n(&mut e, 5);
    assert!(effects.is_empty());
    assert_eq!(e.state().remaining(), IntervalLength::ZERO);
    assert_eq!(e.state().phase(), Phase::Working);

    let effects = e.tick();
    assert_eq!(end_cues(&effects), 1);
    assert!(e.state().is_resting());
    assert_eq!(e.state().remaining(), IntervalLength::new(0, 3));
    assert_eq!(titles(&effects), vec!["Rest period"]);

    let effects = tick_n(&mut e, 4);
    assert!(!e.state().is_resting());
    assert_eq!(e.state().current_repetition(), 2);
    assert_eq!(e.state().remaining(), IntervalLength::new(0, 5));
    assert_eq!(titles(&effects), vec!["Starting repetition 2 of 2"]);
    assert!(effects.iter().any(|eff| eff.is_cue(Cue::Start)));

    let effects = tick_n(&mut e, 6);
    assert!(effects.contains(&Effect::Completed { repetitions: 2 }));
    assert_eq!(titles(&effects), vec!["Workout completed"]);
    let s = e.state();
    assert!(s.is_idle());
    assert_eq!(s.current_repetition(), 1);
    assert!(s.remaining().is_zero());
    assert!(s.config().work.is_zero());
    assert!(s.config().rest.is_zero());
}

#[test]
fn zero_rest_skips_resting_entirely() {
    // work 0:02, no rest, 3 repetitions
    let mut e = engine((0, 2), (0, 0), 3);
    e.start();

    let effects = tick_n(&mut e, 3);
    assert_eq!(e.state().current_repetition(), 2);
    assert!(!e.state().is_resting());
    assert_eq!(e.state().remaining(), IntervalLength::new(0, 2));
    assert!(!titles(&effects).contains(&"Rest period".to_string()));

    tick_n(&mut e, 3);
    assert_eq!(e.state().current_repetition(), 3);
    assert!(!e.state().is_resting());

    let effects = tick_n(&mut e, 3);
    assert!(effects.contains(&Effect::Completed { repetitions: 3 }));
    assert!(e.state().is_idle());
}

#[test]
fn double_reset_inside_window_returns_same_values() {
    let t0 = Instant::now();
    let mut e = engine((0, 40), (1, 0), 3);
    e.start();
    tick_n(&mut e, 2);

    let (first, effects) = e.reset(t0);
    assert_eq!(effects, vec![Effect::StopTicking]);
    let zeros = ResetValues {
        minutes: 0,
        seconds: 0,
        rest_minutes: 0,
        rest_seconds: 0,
    };
    assert_eq!(first, zeros);
    let after_first = e.state().clone();

    let (second, effects) = e.reset(t0 + Duration::from_millis(900));
    assert!(effects.is_empty());
    assert_eq!(second, first);
    assert_eq!(e.state(), &after_first);
}

#[test]
fn debounced_reset_reports_current_values() {
    let t0 = Instant::now();
    let mut e = engine((0, 40), (1, 0), 3);
    e.reset(t0);
    e.set_work_seconds(30);
    e.set_rest_seconds(15);
    let (values, effects) = e.reset(t0 + Duration::from_millis(4999));
    assert!(effects.is_empty());
    assert_eq!(
        values,
        ResetValues {
            minutes: 0,
            seconds: 30,
            rest_minutes: 0,
            rest_seconds: 15,
        }
    );
    let (values, _) = e.reset(t0 + Duration::from_millis(5000));
    assert_eq!(values.seconds, 0);
}

#[test]
fn seconds_overflow_rolls_into_minutes() {
    let mut e = engine((0, 40), (1, 0), 3);
    e.set_work_seconds(65);
    assert_eq!(e.state().config().work.minutes(), 1);
    assert_eq!(e.state().config().work.seconds(), 5);
}

#[test]
fn reset_mid_rest_then_reconfigure_and_rerun() {
    let t0 = Instant::now();
    let mut e = engine((0, 1), (0, 5), 2);
    e.start();
    tick_n(&mut e, 2);
    assert!(e.state().is_resting());

    e.reset(t0);
    assert!(!e.state().is_resting());
    assert!(e.start().is_empty(), "blank timer cannot start");

    e.set_work_seconds(2);
    e.set_total_repetitions(1);
    assert!(!e.start().is_empty());
    let effects = tick_n(&mut e, 3);
    assert!(effects.contains(&Effect::Completed { repetitions: 1 }));
}

#[test]
fn pause_on_boundary_then_resume_transitions_once() {
    let mut e = engine((0, 1), (0, 2), 2);
    e.start();
    e.tick();
    assert!(e.state().remaining().is_zero());
    e.pause();
    assert!(tick_n(&mut e, 5).is_empty());
    e.start();
    let effects = e.tick();
    assert_eq!(end_cues(&effects), 1);
    assert!(e.state().is_resting());
    assert_eq!(e.state().current_repetition(), 1);
}
