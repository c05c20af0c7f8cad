//! `index`
//!
//! Compiles text package listings into the index read by
//! `command-not-found` and `server`.
//!
//! Usage (repositories from the config file):
//!   index
//!
//! Usage (explicit listings; a bare path is the main repository):
//!   index --output commands.idx main.txt x11=x11.txt

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use command_not_found::config::{Config, RepositoryConfig};
use command_not_found::constants::MAIN_REPOSITORY;
use command_not_found::index::{load_listing, save_index, Repository};
use command_not_found::logging;

#[derive(Parser)]
#[command(name = "index", version, about = "Compile package listings into an index")]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the compiled index (overrides the config file).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Listings as `NAME=PATH`, or `PATH` for the main repository. Text
    /// before the first `=` is a name only if it contains no path separator.
    listings: Vec<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn is_repository_name(name: &str) -> bool {
    !name.contains('/') && !name.contains(std::path::MAIN_SEPARATOR)
}

fn parse_listing_arg(arg: &str) -> RepositoryConfig {
    match arg.split_once('=') {
        Some((name, path)) if is_repository_name(name) => RepositoryConfig {
            name: name.to_string(),
            listing: PathBuf::from(path),
        },
        _ => RepositoryConfig {
            name: MAIN_REPOSITORY.to_string(),
            listing: PathBuf::from(arg),
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let mut config = Config::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    logging::init(logging::level_for(cli.verbose, "info"));

    if !cli.listings.is_empty() {
        config.repositories = cli.listings.iter().map(|a| parse_listing_arg(a)).collect();
        config.validate()?;
    }
    if config.repositories.is_empty() {
        bail!("No listings given and no [[repositories]] in {}", config_path.display());
    }

    let mut repositories = Vec::with_capacity(config.repositories.len());
    for repo in &config.repositories {
        let index = load_listing(&repo.listing)
            .with_context(|| format!("Failed to read listing {}", repo.listing.display()))?;
        if index.is_empty() {
            warn!(repository = %repo.name, listing = %repo.listing.display(), "listing is empty");
        }
        info!(
            repository = %repo.name,
            packages = index.packages(),
            binaries = index.binaries(),
            "compiled listing"
        );
        repositories.push(Repository {
            name: repo.name.clone(),
            index,
        });
    }

    let output = cli.output.unwrap_or(config.index);
    save_index(&output, &repositories)
        .with_context(|| format!("Failed to write index {}", output.display()))?;
    println!(
        "Wrote {} repositories to '{}'.",
        repositories.len(),
        output.display()
    );
    Ok(())
}
