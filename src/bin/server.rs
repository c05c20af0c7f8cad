use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use command_not_found::advice::Advice;
use command_not_found::config::Config;
use command_not_found::constants::DEFAULT_BIND_ADDR;
use command_not_found::index::{load_index, CompiledIndex};
use command_not_found::logging;
use command_not_found::lookup::lookup;

#[derive(Parser)]
#[command(name = "server", version, about = "Serve command lookups over HTTP")]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compiled index to serve (overrides the config file).
    #[arg(short, long)]
    index: Option<PathBuf>,

    /// Address to listen on.
    #[arg(short, long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Deserialize)]
struct LookupQuery {
    q: String,
}

struct AppState {
    index: CompiledIndex,
    max_distance: usize,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    logging::init(logging::level_for(cli.verbose, "info"));

    let index_path = cli.index.as_ref().unwrap_or(&config.index);
    info!(path = %index_path.display(), "loading compiled index");
    let index = load_index(index_path).with_context(|| {
        format!(
            "Failed to load index {} (run the `index` binary first)",
            index_path.display()
        )
    })?;

    let state = Arc::new(AppState {
        index,
        max_distance: config.max_distance,
    });

    let app = Router::new()
        .route("/api/lookup", get(lookup_api))
        .with_state(state);

    let listener = TcpListener::bind(cli.bind.as_str()).await?;
    info!("Server running at http://{}", cli.bind);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn lookup_api(
    State(state): State<SharedState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<Advice>, (StatusCode, String)> {
    let result = lookup(&params.q, &state.index.repositories).map_err(|e| {
        warn!(query = %params.q, error = %e, "lookup failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(Advice::from_result(
        &params.q,
        &result,
        state.max_distance,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_not_found::index::{parse_listing, Repository};

    #[test]
    fn index_flag_overrides_config() {
        let cli = Cli::try_parse_from(["server", "--index", "other.idx"]).unwrap();
        assert_eq!(cli.index, Some(PathBuf::from("other.idx")));
        assert_eq!(cli.bind, DEFAULT_BIND_ADDR);
    }

    fn state() -> SharedState {
        Arc::new(AppState {
            index: CompiledIndex {
                repositories: vec![Repository {
                    name: String::new(),
                    index: parse_listing("git\n git\n").unwrap(),
                }],
            },
            max_distance: 3,
        })
    }

    #[tokio::test]
    async fn lookup_returns_advice() {
        let Json(advice) = lookup_api(
            State(state()),
            Query(LookupQuery {
                q: "gti".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(matches!(advice, Advice::DidYouMean { distance: 2, .. }));
    }

    #[tokio::test]
    async fn exact_lookup_is_install_advice() {
        let Json(advice) = lookup_api(
            State(state()),
            Query(LookupQuery {
                q: "git".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(matches!(advice, Advice::Install { .. }));
    }
}
