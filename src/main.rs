use clap::{Parser, Subcommand};
use healthcoach_core::{DurableStore, SystemClock, Tracker};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod ticker;

use commands::{
    CheckinCommand, ConfigCommand, HistoryCommand, Intake, IntakeCommand, StatusCommand,
    WorkoutCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "coach")]
#[command(version)]
#[command(about = "A personal health coach: daily check-in, intake and workouts", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's summary
    Status(StatusCommand),

    /// Daily check-in: mood, energy, sleep and notes
    Checkin(CheckinCommand),

    /// Track protein intake (grams)
    Protein(IntakeCommand),

    /// Track water intake (ounces)
    Water(IntakeCommand),

    /// Run and log catalog workouts
    Workout(WorkoutCommand),

    /// Show daily history
    History(HistoryCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coach=warn,healthcoach_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    let command = match &cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config, cli_config_path),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let catalog = config.load_catalog()?;
    let store = DurableStore::open_dir(config.data_dir.value.clone());
    let mut tracker = Tracker::open(store, catalog, SystemClock)?;
    tracing::debug!(data_dir = %config.data_dir.value.display(), "tracker ready");

    match command {
        Commands::Status(cmd) => cmd.run(&mut tracker, &config),
        Commands::Checkin(cmd) => cmd.run(&mut tracker),
        Commands::Protein(cmd) => cmd.run(Intake::Protein, &mut tracker, &config),
        Commands::Water(cmd) => cmd.run(Intake::Water, &mut tracker, &config),
        Commands::Workout(cmd) => cmd.run(&mut tracker),
        Commands::History(cmd) => cmd.run(&mut tracker),
        Commands::Config(cmd) => cmd.run(&config, cli_config_path),
    }
}
