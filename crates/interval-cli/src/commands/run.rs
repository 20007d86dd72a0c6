use std::sync::Arc;

use interval_core::{Config, Effect, IntervalLength, Theme, TimerHandle, TimerService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::WorkoutArgs;
use crate::console::{status_line, ConsoleNotifier, TerminalBell};

const HELP: &str = "\
commands: s start/resume | p pause | r reset | m mute | q quit
          w M:SS work | rest M:SS rest | reps N | theme NAME";

pub fn run(workout: WorkoutArgs, start: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = workout.build_engine(&config);

    // One thread: the timer service and the input loop share a single queue.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async move {
        let timer = TimerService::spawn(
            engine,
            Arc::new(TerminalBell::default()),
            Arc::new(ConsoleNotifier),
        );
        let outcome = drive(&timer, start).await;
        timer.shutdown().await?;
        outcome
    });
    // A pending stdin read would otherwise hold the runtime open until Enter.
    runtime.shutdown_background();
    result
}

async fn drive(timer: &TimerHandle, start: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = timer.watch();
    let mut effects = timer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{HELP}");
    println!("{}", status_line(&state.borrow_and_update()));
    if start && timer.start().await?.is_idle() {
        eprintln!("nothing to start: set a work length with `w M:SS`");
    }

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", status_line(&state.borrow_and_update()));
            }
            effect = effects.recv() => match effect {
                Ok(Effect::Completed { repetitions }) => {
                    info!(repetitions, "workout finished");
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "display fell behind"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if !handle_line(timer, line.trim()).await? {
                        break;
                    }
                }
                // Keep counting down without input, but nothing can start
                // or resume an idle or paused timer once stdin is gone.
                None => {
                    if !timer.snapshot().is_running() {
                        info!("stdin closed with no workout running");
                        break;
                    }
                    stdin_open = false;
                }
            },
        }
    }
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn handle_line(timer: &TimerHandle, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };
    match cmd {
        "" => {}
        "s" | "start" => {
            timer.start().await?;
        }
        "p" | "pause" => {
            timer.pause().await?;
        }
        "r" | "reset" => {
            let values = timer.reset().await?;
            println!(
                "work {}  rest {}",
                IntervalLength::new(values.minutes.into(), values.seconds.into()),
                IntervalLength::new(values.rest_minutes.into(), values.rest_seconds.into()),
            );
        }
        "m" | "mute" => {
            timer.toggle_mute().await?;
        }
        "w" | "work" => match arg.parse::<IntervalLength>() {
            Ok(len) => {
                timer.set_work_minutes(len.minutes().into()).await?;
                timer.set_work_seconds(len.seconds().into()).await?;
            }
            Err(e) => eprintln!("{e}"),
        },
        "rest" => match arg.parse::<IntervalLength>() {
            Ok(len) => {
                timer.set_rest_minutes(len.minutes().into()).await?;
                timer.set_rest_seconds(len.seconds().into()).await?;
            }
            Err(e) => eprintln!("{e}"),
        },
        "reps" => match arg.parse::<i64>() {
            Ok(n) => {
                timer.set_total_repetitions(n).await?;
            }
            Err(_) => eprintln!("expected a number, got '{arg}'"),
        },
        "theme" => match arg.parse::<Theme>() {
            Ok(theme) => {
                timer.set_theme(theme).await?;
                println!("theme {theme}");
            }
            Err(e) => eprintln!("{e}"),
        },
        "q" | "quit" => return Ok(false),
        "h" | "help" | "?" => println!("{HELP}"),
        other => eprintln!("unknown command '{other}' (h for help)"),
    }
    Ok(true)
}
