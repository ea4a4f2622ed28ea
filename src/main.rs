mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use memguard::config::MemguardConfig;

#[derive(Parser)]
#[command(
    name = "memguard",
    version,
    about = "Path guard and type statistics for an MCP memory store"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pre-tool-use hook: read the tool call from stdin, exit 2 to block it
    Guard,
    /// Check the configured data directory and print a report
    Check,
    /// Print record counts by type as JSON
    Stats {
        /// Collection to report on (default: MEMGUARD_COLLECTION or project_memory)
        #[arg(long)]
        collection: Option<String>,
        /// Store data directory (default: MEMGUARD_DATA_DIR or ./.store)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, settings_error) = match MemguardConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (MemguardConfig::from_env(), Some(e)),
    };

    // Log to stderr so stdout stays clean for the JSON report.
    let filter = EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // A broken settings file must not block a hook, but it must not go unnoticed.
    if let Some(e) = settings_error {
        eprintln!("Warning: ignoring settings file: {e:#}");
    }

    let code = match cli.command {
        Command::Guard => cli::guard::guard(&config),
        Command::Check => cli::check::check(&config).unwrap_or_else(|e| {
            eprintln!("check failed: {e:#}");
            1
        }),
        Command::Stats {
            collection,
            data_dir,
        } => cli::stats::stats(&config, collection.as_deref(), data_dir.as_deref())
            .unwrap_or_else(|e| {
                eprintln!("stats failed: {e:#}");
                1
            }),
    };

    ExitCode::from(code)
}
