mod cmd_archive;
mod cmd_config;
mod cmd_import;
mod cmd_play;
mod cmd_serve;
mod cmd_today;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use limner_store::LimnerPaths;
use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter.
const LOG_ENV: &str = "LIMNER_LOG";

#[derive(Parser)]
#[command(name = "limner", version, about = "Guess the painter, one painting a day")]
struct Cli {
    /// Data directory (default: $LIMNER_HOME, else the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a puzzle in the terminal
    Play {
        /// Puzzle date (YYYY-MM-DD); defaults to today
        #[arg(long, conflicts_with = "days_ago")]
        date: Option<String>,
        /// Play the puzzle from N days ago
        #[arg(long)]
        days_ago: Option<u32>,
        /// End the puzzle now and show the answer
        #[arg(long)]
        give_up: bool,
    },
    /// Show today's puzzle without the answer
    Today,
    /// List past puzzles, newest first
    Archive {
        /// Maximum number of dates to list
        #[arg(long, default_value_t = 30)]
        limit: usize,
    },
    /// Load artists and puzzles from a JSON catalog file
    Import {
        /// Path to a `{ "artists": [...], "puzzles": [...] }` document
        file: PathBuf,
    },
    /// Start the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port
        #[arg(long, default_value_t = 7433)]
        port: u16,
    },
    /// Manage game configuration (<data dir>/config.json)
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("limner=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let paths = LimnerPaths::resolve(cli.data_dir.as_deref());

    match cli.cmd {
        Command::Play {
            date,
            days_ago,
            give_up,
        } => cmd_play::execute(&paths, date.as_deref(), days_ago, give_up),
        Command::Today => cmd_today::execute(&paths),
        Command::Archive { limit } => cmd_archive::execute(&paths, limit),
        Command::Import { file } => cmd_import::execute(&paths, &file),
        Command::Serve { bind, port } => cmd_serve::execute(&paths, &bind, port),
        Command::Config { cmd } => cmd_config::run(cmd, &paths),
    }
}
