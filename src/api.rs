//! Public entry points of the pipeline.
//!
//! Three operations: the player pool for a period, the scoring snapshot for
//! a period + mode, and the current-period computation. Callers distinguish
//! three outcomes: populated result, empty-but-successful result ("no data
//! yet for this period"), and a hard error — partial upstream failures ride
//! along as `warnings`, never as errors.

use crate::aggregate::{Aggregator, PlayerIdentity, ScoringRecord};
use crate::cli::types::{Period, ScoringMode, Season, Sport};
use crate::config::SourceConfig;
use crate::error::{PickemError, Result};
use crate::period;
use crate::scoring::{self, StatLine};
use crate::sources::{nba, nfl};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Where the snapshot data came from and how much of it matched. Carried for
/// the debug surface and the UI's provenance line.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_used: Option<Season>,
    pub parsed_rows: usize,
    pub matched_rows: usize,
    pub missing_id_rows: usize,
    pub events: usize,
    pub events_processed: usize,
}

/// The primary output: per-player stat lines and fantasy points for one
/// period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSnapshot {
    pub period: Period,
    pub mode: ScoringMode,
    pub stats: BTreeMap<String, StatLine>,
    pub points: BTreeMap<String, f64>,
    /// Identities behind the map keys, so display layers don't need a second
    /// pool fetch to put names on scores.
    pub players: BTreeMap<String, PlayerIdentity>,
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl ScoringSnapshot {
    /// (player, points) pairs in presentation order: points descending, ties
    /// broken by name ascending.
    pub fn ranked(&self) -> Vec<(&PlayerIdentity, f64)> {
        let mut ranked: Vec<(&PlayerIdentity, f64)> = self
            .players
            .values()
            .map(|player| {
                (
                    player,
                    self.points.get(&player.id).copied().unwrap_or(0.0),
                )
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase()))
        });
        ranked
    }
}

/// Whether a football pool covers the whole season (so bye-week and injured
/// players still appear on pick screens) or only the requested week.
/// Basketball pools are always slate-scoped by their date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolScope {
    Season,
    Week,
}

/// The selectable player pool for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPool {
    pub period: Period,
    pub players: Vec<PlayerIdentity>,
    pub warnings: Vec<String>,
    pub teams_tried: usize,
    pub roster_ok: usize,
    pub used_fallback_teams: bool,
}

/// Compute the current period for a sport. Pure given `now`; changes at most
/// weekly for football, daily for basketball, so an hourly cache upstream is
/// plenty.
pub fn get_current_period(sport: Sport, now: DateTime<Utc>) -> Period {
    period::current_period(sport, now)
}

/// Fetch, normalize, and score every poolable player for a period.
pub async fn get_scoring_snapshot(
    config: &SourceConfig,
    period: &Period,
    mode: ScoringMode,
) -> Result<ScoringSnapshot> {
    match period {
        Period::Week { season, week } => {
            football_snapshot(config, *period, *season, week.validate()?, mode).await
        }
        Period::Date { .. } => basketball_snapshot(config, *period, mode).await,
    }
}

/// Fetch the selectable player pool for a period.
pub async fn get_player_pool(
    config: &SourceConfig,
    period: &Period,
    scope: PoolScope,
) -> Result<PlayerPool> {
    match period {
        Period::Week { season, week } => {
            football_pool(config, *period, *season, Some(*week).filter(|_| scope == PoolScope::Week))
                .await
        }
        Period::Date { .. } => basketball_pool(config, *period).await,
    }
}

async fn football_snapshot(
    config: &SourceConfig,
    period: Period,
    season: Season,
    week: crate::cli::types::Week,
    mode: ScoringMode,
) -> Result<ScoringSnapshot> {
    let client = config.client()?;
    let snapshot = nfl::fetch_season_snapshot_with_fallback(config, &client, season).await?;

    let mut warnings = snapshot.warnings.clone();
    let mut aggregator = Aggregator::new(config.merge_policy);
    let mut matched_rows = 0usize;
    let mut missing_id = 0usize;

    for row in nfl::week_rows(&snapshot.rows, week) {
        matched_rows += 1;
        let Some(player) = nfl::row_identity(row) else {
            missing_id += 1;
            continue;
        };
        let line = nfl::row_stat_line(row);
        let points = scoring::football_points_or_precomputed(
            nfl::row_precomputed_points(row, mode),
            &line,
            mode,
        );
        aggregator.observe(ScoringRecord {
            player,
            period,
            points,
            line: StatLine::Football(line),
        });
    }

    if missing_id > 0 {
        warnings.push(format!(
            "{missing_id} rows for week {week} missing player id (skipped)"
        ));
    }
    info!(
        season = snapshot.season_used.as_u16(),
        week = week.as_u16(),
        players = aggregator.len(),
        "football snapshot scored"
    );

    let provenance = Provenance {
        resolved_from: Some(snapshot.resolved_from),
        season_used: Some(snapshot.season_used),
        parsed_rows: snapshot.rows.len(),
        matched_rows,
        missing_id_rows: missing_id,
        ..Default::default()
    };
    Ok(build_snapshot(period, mode, aggregator, warnings, provenance))
}

async fn basketball_snapshot(
    config: &SourceConfig,
    period: Period,
    mode: ScoringMode,
) -> Result<ScoringSnapshot> {
    let compact = period
        .compact_date()
        .ok_or_else(|| PickemError::InvalidPeriod("basketball needs a calendar date".into()))?;
    let client = config.client()?;
    let boxes = nba::fetch_box_scores(config, &client, &compact).await?;

    let mut aggregator = Aggregator::new(config.merge_policy);
    let matched_rows = boxes.lines.len();
    for (player, line) in boxes.lines {
        let points = scoring::basketball_points(&line);
        aggregator.observe(ScoringRecord {
            player,
            period,
            points,
            line: StatLine::Basketball(line),
        });
    }
    info!(
        date = %period,
        events = boxes.events,
        players = aggregator.len(),
        "basketball snapshot scored"
    );

    let provenance = Provenance {
        matched_rows,
        events: boxes.events,
        events_processed: boxes.events_processed,
        ..Default::default()
    };
    Ok(build_snapshot(period, mode, aggregator, boxes.warnings, provenance))
}

fn build_snapshot(
    period: Period,
    mode: ScoringMode,
    aggregator: Aggregator,
    warnings: Vec<String>,
    provenance: Provenance,
) -> ScoringSnapshot {
    let mut stats = BTreeMap::new();
    let mut points = BTreeMap::new();
    let mut players = BTreeMap::new();
    for (id, record) in aggregator.into_records() {
        stats.insert(id.clone(), record.line);
        points.insert(id.clone(), record.points);
        players.insert(id, record.player);
    }
    ScoringSnapshot {
        period,
        mode,
        stats,
        points,
        players,
        warnings,
        provenance,
    }
}

async fn football_pool(
    config: &SourceConfig,
    period: Period,
    season: Season,
    week: Option<crate::cli::types::Week>,
) -> Result<PlayerPool> {
    let client = config.client()?;
    let snapshot = nfl::fetch_season_snapshot_with_fallback(config, &client, season).await?;

    let mut players: Vec<PlayerIdentity> = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    let rows: Vec<&crate::fields::RawRow> = match week {
        Some(week) => nfl::week_rows(&snapshot.rows, week.validate()?).collect(),
        None => nfl::season_rows(&snapshot.rows).collect(),
    };
    for row in rows {
        let Some(player) = nfl::row_identity(row) else {
            continue;
        };
        if seen.insert(player.id.clone()) {
            players.push(player);
        }
    }
    players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(PlayerPool {
        period,
        players,
        warnings: snapshot.warnings,
        teams_tried: 0,
        roster_ok: 0,
        used_fallback_teams: false,
    })
}

async fn basketball_pool(config: &SourceConfig, period: Period) -> Result<PlayerPool> {
    let compact = period
        .compact_date()
        .ok_or_else(|| PickemError::InvalidPeriod("basketball needs a calendar date".into()))?;
    let client = config.client()?;
    let pool = nba::fetch_rosters(config, &client, &compact).await?;

    Ok(PlayerPool {
        period,
        players: pool.players,
        warnings: pool.warnings,
        teams_tried: pool.teams_tried,
        roster_ok: pool.roster_ok,
        used_fallback_teams: pool.used_fallback_teams,
    })
}
