//! Player pool retrieval and display.

use crate::api::{self, PlayerPool, PoolScope};
use crate::cache::{SnapshotCacheKey, TtlCache, SNAPSHOT_TTL};
use crate::cli::CommonFilters;
use crate::config::SourceConfig;
use crate::error::Result;

use super::resolve_period;

/// Configuration for the `get player-pool` command.
#[derive(Debug)]
pub struct PlayerPoolParams {
    pub filters: CommonFilters,
    pub as_json: bool,
    pub week_scoped: bool,
    pub refresh: bool,
}

/// Fetch and print the selectable pool for the resolved period.
pub async fn handle_player_pool(params: PlayerPoolParams) -> Result<()> {
    let config = SourceConfig::from_env();
    let period = resolve_period(&params.filters)?;
    let scope = if params.week_scoped {
        PoolScope::Week
    } else {
        PoolScope::Season
    };

    let cache: TtlCache<SnapshotCacheKey, PlayerPool> = TtlCache::new(16, SNAPSHOT_TTL);
    let mut key = SnapshotCacheKey::new(params.filters.sport, &period, None);
    if params.week_scoped {
        key.period_tag.push_str("-scoped");
    }
    if params.refresh {
        let _ = cache.invalidate(&key);
    }

    let pool = match cache.get(&key) {
        Some(pool) => {
            println!("Using cached player pool for {period}...");
            pool
        }
        None => {
            println!(
                "Fetching {} player pool for {period}...",
                params.filters.sport
            );
            let pool = api::get_player_pool(&config, &period, scope).await?;
            let _ = cache.put(key, pool.clone());
            pool
        }
    };

    for warning in &pool.warnings {
        eprintln!("warning: {warning}");
    }
    if pool.used_fallback_teams {
        eprintln!("note: slate was empty or unavailable; pool built from the league-wide team list");
    }
    println!("✓ Pool holds {} players for {period}", pool.players.len());

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&pool)?);
    } else {
        for player in &pool.players {
            let team = player.team.as_deref().unwrap_or("-");
            println!("{} {} ({}) [{}]", player.id, player.name, player.position, team);
        }
    }

    Ok(())
}
