//! HBNB Console Binary
//!
//! Loads the backing file and runs the command console.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use hbnb::console::{run_interactive, run_pipe};
use hbnb::{Config, Console, FileStorage};
use tracing_subscriber::{fmt, EnvFilter};

/// HBNB Console
#[derive(Parser, Debug)]
#[command(name = "hbnb")]
#[command(about = "Command console for the HBNB object store")]
#[command(version)]
struct Args {
    /// JSON file holding all records
    #[arg(short, long, default_value = "file.json")]
    file: PathBuf,

    /// Interactive prompt
    #[arg(long, default_value = "(hbnb) ")]
    prompt: String,

    /// Keep interactive history in this file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Read commands from stdin without a prompt even on a terminal
    #[arg(long)]
    no_interactive: bool,
}

fn main() {
    // Logs go to stderr; stdout carries command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_file(&args.file)
        .prompt(args.prompt)
        .history_file(args.history)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("HBNB console v{}", hbnb::VERSION);
    tracing::info!("Data file: {}", config.data_file.display());

    // Reload once, before the first command
    let (storage, report) = match FileStorage::open(&config.data_file) {
        Ok(opened) => opened,
        Err(e) => {
            tracing::error!("Failed to load {}: {}", config.data_file.display(), e);
            std::process::exit(1);
        }
    };

    for skipped in &report.skipped {
        println!("** skipped {}: {} **", skipped.key, skipped.reason);
    }
    tracing::info!("Loaded {} records", report.records_loaded);

    let mut console = Console::new(storage);
    let result = if std::io::stdin().is_terminal() && !args.no_interactive {
        run_interactive(&mut console, &config)
    } else {
        run_pipe(&mut console)
    };

    if let Err(e) = result {
        tracing::error!("Console stopped: {}", e);
        std::process::exit(1);
    }
}
