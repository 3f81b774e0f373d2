//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use pickem_stats::{
    cli::{Commands, GetCmd, Pickem},
    commands::{
        period::{handle_current_period, handle_find_period},
        player_pool::{handle_player_pool, PlayerPoolParams},
        snapshot::{handle_snapshot, SnapshotParams},
    },
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let app = Pickem::parse();

    match app.command {
        Commands::Get { cmd } => match cmd {
            GetCmd::Snapshot {
                filters,
                json,
                debug,
                refresh,
            } => {
                handle_snapshot(SnapshotParams {
                    filters,
                    as_json: json,
                    debug,
                    refresh,
                })
                .await?
            }

            GetCmd::PlayerPool {
                filters,
                json,
                week_scoped,
                refresh,
            } => {
                handle_player_pool(PlayerPoolParams {
                    filters,
                    as_json: json,
                    week_scoped,
                    refresh,
                })
                .await?
            }

            GetCmd::CurrentPeriod {
                sport,
                json,
                refresh,
            } => handle_current_period(sport, json, refresh).await?,

            GetCmd::FindPeriod { json } => handle_find_period(json).await?,
        },
    }

    Ok(())
}
