use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "interval-cli", version, about = "Interval workout timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live workout in the terminal
    Run {
        #[command(flatten)]
        workout: commands::WorkoutArgs,
        /// Start counting down immediately instead of waiting for `s`
        #[arg(long)]
        start: bool,
    },
    /// Step through a workout without waiting and print one JSON line per tick
    Simulate {
        #[command(flatten)]
        workout: commands::WorkoutArgs,
        /// Stop after this many ticks even if the workout is not finished
        #[arg(long, default_value = "20000")]
        max_ticks: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("interval_core=warn,interval_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { workout, start } => commands::run::run(workout, start),
        Commands::Simulate { workout, max_ticks } => commands::simulate::run(workout, max_ticks),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "interval-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
