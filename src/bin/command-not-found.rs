//! `command-not-found <command>`
//!
//! Called by the shell when a command is missing. Loads the compiled index,
//! finds the closest binaries and prints install advice to stderr.
//!
//! Usage:
//!   command-not-found gti
//!   command-not-found --json --index custom.idx gti

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use command_not_found::advice::Advice;
use command_not_found::config::Config;
use command_not_found::constants::EXIT_COMMAND_NOT_FOUND;
use command_not_found::index::load_index;
use command_not_found::logging;
use command_not_found::lookup::lookup;

#[derive(Parser)]
#[command(name = "command-not-found", version, about = "Suggest packages for an unknown command")]
struct Cli {
    /// The command that was not found.
    command: String,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compiled index to search (overrides the config file).
    #[arg(short, long)]
    index: Option<PathBuf>,

    /// Print the advice as JSON on stdout instead of text on stderr.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    logging::init(logging::level_for(cli.verbose, &config.log_level));

    let index_path = cli.index.as_ref().unwrap_or(&config.index);
    let index = load_index(index_path).with_context(|| {
        format!(
            "Failed to load index {} (run the `index` binary first)",
            index_path.display()
        )
    })?;

    let result = lookup(&cli.command, &index.repositories)
        .with_context(|| format!("Lookup for '{}' failed", cli.command))?;
    debug!(best = ?result.best_distance, "advising");

    let advice = Advice::from_result(&cli.command, &result, config.max_distance);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        eprint!("{}", advice.render(&config.install_command));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_COMMAND_NOT_FOUND),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
