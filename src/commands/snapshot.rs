//! Scoring snapshot retrieval and display.

use crate::api::{self, ScoringSnapshot};
use crate::cache::{SnapshotCacheKey, TtlCache, SNAPSHOT_TTL};
use crate::cli::CommonFilters;
use crate::config::SourceConfig;
use crate::error::Result;

use super::resolve_period;

/// Configuration for the `get snapshot` command.
#[derive(Debug)]
pub struct SnapshotParams {
    pub filters: CommonFilters,
    pub as_json: bool,
    pub debug: bool,
    pub refresh: bool,
}

/// Fetch, score, and print the snapshot for the resolved period.
pub async fn handle_snapshot(params: SnapshotParams) -> Result<()> {
    let config = SourceConfig::from_env();
    let period = resolve_period(&params.filters)?;
    let mode = params.filters.mode;

    let cache: TtlCache<SnapshotCacheKey, ScoringSnapshot> = TtlCache::new(16, SNAPSHOT_TTL);
    let key = SnapshotCacheKey::new(params.filters.sport, &period, Some(mode));
    if params.refresh {
        let _ = cache.invalidate(&key);
    }

    let snapshot = match cache.get(&key) {
        Some(snapshot) => {
            println!("Using cached snapshot for {period}...");
            snapshot
        }
        None => {
            println!(
                "Fetching {} stats for {period} (mode {mode})...",
                params.filters.sport
            );
            let snapshot = api::get_scoring_snapshot(&config, &period, mode).await?;
            let _ = cache.put(key, snapshot.clone());
            snapshot
        }
    };

    if params.debug {
        eprintln!("DEBUG: provenance");
        if let Some(url) = &snapshot.provenance.resolved_from {
            eprintln!("  resolved from: {url}");
        }
        if let Some(season) = snapshot.provenance.season_used {
            eprintln!("  season used: {season}");
        }
        eprintln!(
            "  rows: {} parsed, {} matched, {} missing id",
            snapshot.provenance.parsed_rows,
            snapshot.provenance.matched_rows,
            snapshot.provenance.missing_id_rows
        );
        if snapshot.provenance.events > 0 {
            eprintln!(
                "  events: {} of {} processed",
                snapshot.provenance.events_processed, snapshot.provenance.events
            );
        }
    }

    for warning in &snapshot.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "✓ Scored {} players for {period}",
        snapshot.points.len()
    );

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        for (player, points) in snapshot.ranked() {
            let team = player.team.as_deref().unwrap_or("-");
            println!(
                "{} {} ({}) [{}] {:.2}",
                player.id, player.name, player.position, team, points
            );
        }
    }

    Ok(())
}
