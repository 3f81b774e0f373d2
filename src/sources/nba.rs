//! Basketball source adapter: scoreboard, box-score summaries, and team
//! rosters.
//!
//! The slate for a date resolves to event ids, each event's summary carries
//! per-athlete stat sections, and rosters hang off the team endpoint in one
//! of several payload shapes depending on provider API version. Per-event
//! and per-team failures degrade to warnings; only a failed scoreboard is a
//! hard `SourceUnavailable`.

use crate::aggregate::PlayerIdentity;
use crate::cli::types::Position;
use crate::config::SourceConfig;
use crate::error::{PickemError, Result};
use crate::fields::{self, nba, RawRow};
use crate::scoring::BasketballLine;
use crate::sources::http;
use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// Cap on per-entity failure warnings carried back to the caller; past this
/// the count matters more than the individual messages.
const MAX_SAMPLE_WARNINGS: usize = 4;

/// Box-score stat lines for every athlete on a date's slate.
#[derive(Debug, Default)]
pub struct BoxScores {
    pub lines: Vec<(PlayerIdentity, BasketballLine)>,
    pub events: usize,
    pub events_processed: usize,
    pub warnings: Vec<String>,
}

/// Roster pool for a date's slate (or the whole league as fallback).
#[derive(Debug, Default)]
pub struct RosterPool {
    pub players: Vec<PlayerIdentity>,
    pub teams_tried: usize,
    pub roster_ok: usize,
    pub used_fallback_teams: bool,
    pub warnings: Vec<String>,
}

fn scoreboard_url(config: &SourceConfig, compact_date: &str) -> String {
    format!("{}/scoreboard?dates={}", config.nba_base, compact_date)
}

fn summary_url(config: &SourceConfig, event_id: &str) -> String {
    format!("{}/summary?event={}", config.nba_base, event_id)
}

fn teams_url(config: &SourceConfig) -> String {
    format!("{}/teams", config.nba_base)
}

fn roster_url(config: &SourceConfig, team_id: &str) -> String {
    format!("{}/teams/{}?enable=roster", config.nba_base, team_id)
}

/// Fetch the scoreboard for a date. This is the one fetch with no sibling to
/// degrade to, so failure maps to `SourceUnavailable`.
async fn fetch_scoreboard(
    config: &SourceConfig,
    client: &Client,
    compact_date: &str,
) -> Result<Value> {
    let url = scoreboard_url(config, compact_date);
    http::fetch_json(client, &url)
        .await
        .map_err(|err| PickemError::SourceUnavailable {
            period: compact_date.to_string(),
            attempts: vec![format!("- {url}: {err}")],
        })
}

/// Fetch and merge every box score on the date's slate. Zero scheduled
/// events (an off day) is a valid empty result, not an error.
pub async fn fetch_box_scores(
    config: &SourceConfig,
    client: &Client,
    compact_date: &str,
) -> Result<BoxScores> {
    let scoreboard = fetch_scoreboard(config, client, compact_date).await?;
    let event_ids = scoreboard_event_ids(&scoreboard);

    let mut result = BoxScores {
        events: event_ids.len(),
        ..Default::default()
    };
    if event_ids.is_empty() {
        debug!(compact_date, "no scheduled events");
        return Ok(result);
    }

    let fetches = event_ids.iter().map(|event_id| {
        let url = summary_url(config, event_id);
        async move { (event_id.clone(), http::fetch_json(client, &url).await) }
    });

    let mut summed_athletes = 0usize;
    for (event_id, fetched) in join_all(fetches).await {
        match fetched {
            Ok(summary) => {
                summed_athletes += extract_athlete_lines(&summary, &mut result.lines);
                result.events_processed += 1;
            }
            Err(err) => {
                warn!(%event_id, %err, "box score fetch failed, skipping event");
                if result.warnings.len() < MAX_SAMPLE_WARNINGS {
                    result.warnings.push(format!("event {event_id}: {err}"));
                }
            }
        }
    }
    if summed_athletes > 0 {
        result.warnings.push(format!(
            "{summed_athletes} athletes had no totals-tagged stat section; summed sections instead (values may double-count)"
        ));
    }
    Ok(result)
}

/// Fetch the roster pool for a date. Slate teams come from the scoreboard;
/// an empty slate (or a fully failed roster pass) falls back to the
/// league-wide team list so the pool is never empty just because nobody
/// plays today.
pub async fn fetch_rosters(
    config: &SourceConfig,
    client: &Client,
    compact_date: &str,
) -> Result<RosterPool> {
    let mut pool = RosterPool::default();

    let mut teams: Vec<(String, String)> = match fetch_scoreboard(config, client, compact_date).await
    {
        Ok(scoreboard) => scoreboard_teams(&scoreboard),
        Err(err) => {
            debug!(%err, "scoreboard unavailable for roster pool, using league teams");
            Vec::new()
        }
    };

    if teams.is_empty() {
        pool.used_fallback_teams = true;
        teams = fetch_league_teams(config, client).await?;
    }

    fetch_team_rosters(config, client, &teams, &mut pool).await;

    // Every slate roster flaked: one more pass over the league list.
    if pool.players.is_empty() && !pool.used_fallback_teams {
        pool.used_fallback_teams = true;
        let league = fetch_league_teams(config, client).await?;
        fetch_team_rosters(config, client, &league, &mut pool).await;
    }

    dedup_players(&mut pool.players);
    pool.players.sort_by(|a, b| {
        a.team
            .cmp(&b.team)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(pool)
}

async fn fetch_team_rosters(
    config: &SourceConfig,
    client: &Client,
    teams: &[(String, String)],
    pool: &mut RosterPool,
) {
    pool.teams_tried += teams.len();
    let fetches = teams.iter().map(|(team_id, abbr)| {
        let url = roster_url(config, team_id);
        async move { (team_id.clone(), abbr.clone(), http::fetch_json(client, &url).await) }
    });

    for (team_id, abbr, fetched) in join_all(fetches).await {
        match fetched {
            Ok(payload) => {
                let players = extract_team_players(&payload, &abbr);
                if !players.is_empty() {
                    pool.roster_ok += 1;
                    pool.players.extend(players);
                }
            }
            Err(err) => {
                warn!(%team_id, %err, "roster fetch failed, skipping team");
                if pool.warnings.len() < MAX_SAMPLE_WARNINGS {
                    pool.warnings.push(format!("team {team_id}: {err}"));
                }
            }
        }
    }
}

async fn fetch_league_teams(
    config: &SourceConfig,
    client: &Client,
) -> Result<Vec<(String, String)>> {
    let url = teams_url(config);
    let payload = http::fetch_json(client, &url)
        .await
        .map_err(|err| PickemError::SourceUnavailable {
            period: "league team list".to_string(),
            attempts: vec![format!("- {url}: {err}")],
        })?;

    let list = payload
        .pointer("/sports/0/leagues/0/teams")
        .or_else(|| payload.get("teams"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut teams = Vec::new();
    for wrapper in &list {
        let team = wrapper.get("team").unwrap_or(wrapper);
        let Some(id) = id_of(team.get("id")) else {
            continue;
        };
        let abbr = first_string(team, &["abbreviation", "shortDisplayName"]).unwrap_or_default();
        teams.push((id, abbr));
    }
    Ok(teams)
}

/// Event ids on the scoreboard, tolerating `id` vs `uid` drift.
fn scoreboard_event_ids(scoreboard: &Value) -> Vec<String> {
    scoreboard
        .get("events")
        .and_then(Value::as_array)
        .map(|events| {
            events
                .iter()
                .filter_map(|event| id_of(event.get("id")).or_else(|| id_of(event.get("uid"))))
                .collect()
        })
        .unwrap_or_default()
}

/// (team id, abbreviation) for every competitor on the scoreboard.
fn scoreboard_teams(scoreboard: &Value) -> Vec<(String, String)> {
    let mut teams: Vec<(String, String)> = Vec::new();
    let events = scoreboard
        .get("events")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for event in &events {
        let competitions = event
            .get("competitions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for competition in &competitions {
            let competitors = competition
                .get("competitors")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for competitor in &competitors {
                let Some(team) = competitor.get("team") else {
                    continue;
                };
                let Some(id) = id_of(team.get("id")) else {
                    continue;
                };
                if teams.iter().any(|(existing, _)| existing == &id) {
                    continue;
                }
                let abbr =
                    first_string(team, &["abbreviation", "shortDisplayName"]).unwrap_or_default();
                teams.push((id, abbr));
            }
        }
    }
    teams
}

/// Pull every athlete stat line out of one event summary. Returns how many
/// athletes needed the sum-all-sections fallback (no totals tag).
fn extract_athlete_lines(
    summary: &Value,
    out: &mut Vec<(PlayerIdentity, BasketballLine)>,
) -> usize {
    let mut summed = 0usize;
    let team_blocks = summary
        .pointer("/boxscore/players")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for team_block in &team_blocks {
        let team_abbr = team_block
            .get("team")
            .and_then(|team| first_string(team, &["abbreviation", "shortDisplayName"]));
        let athletes = team_block
            .get("athletes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for entry in &athletes {
            let Some(athlete) = entry.get("athlete") else {
                continue;
            };
            let Some(identity) = athlete_identity(athlete, entry, team_abbr.clone()) else {
                continue;
            };

            let sections = entry
                .get("stats")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let (line, used_sum) = line_from_sections(&sections);
            if used_sum {
                summed += 1;
            }
            out.push((identity, line));
        }
    }
    summed
}

fn athlete_identity(
    athlete: &Value,
    entry: &Value,
    team: Option<String>,
) -> Option<PlayerIdentity> {
    let name = first_string(athlete, &["displayName", "fullName", "shortName"]);
    let raw_position = athlete
        .pointer("/position/abbreviation")
        .or_else(|| athlete.pointer("/position/name"))
        .or_else(|| entry.pointer("/position/abbreviation"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let position = Position::normalize_basketball(raw_position);

    match id_of(athlete.get("id")) {
        Some(id) => Some(PlayerIdentity::new(
            format!("nba:{id}"),
            name.unwrap_or_else(|| "Unknown".to_string()),
            position,
            team,
        )),
        // no provider id: a named athlete still gets a stable identity
        None => name.map(|name| PlayerIdentity::synthesized(name, position, team)),
    }
}

/// Build a stat line from an athlete's sections. A totals-tagged section is
/// authoritative when the provider supplies one; otherwise all sections are
/// summed as a fallback (the caller flags this as a data-quality risk).
fn line_from_sections(sections: &[Value]) -> (BasketballLine, bool) {
    if let Some(totals) = sections.iter().find(|s| is_totals_section(s)) {
        return (line_from_section(totals), false);
    }
    let mut line = BasketballLine::default();
    for section in sections {
        let part = line_from_section(section);
        line = BasketballLine {
            pts: line.pts + part.pts,
            reb: line.reb + part.reb,
            ast: line.ast + part.ast,
            stl: line.stl + part.stl,
            blk: line.blk + part.blk,
            tov: line.tov + part.tov,
            fg3m: line.fg3m + part.fg3m,
            min: line.min + part.min,
        };
    }
    (line, sections.len() > 1)
}

fn is_totals_section(section: &Value) -> bool {
    ["type", "name", "label", "displayName"].iter().any(|key| {
        section
            .get(*key)
            .and_then(Value::as_str)
            .is_some_and(|tag| tag.to_lowercase().contains("total"))
    })
}

/// One section's named stat entries, routed through the synonym resolver.
fn line_from_section(section: &Value) -> BasketballLine {
    let entries = section
        .get("stats")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut row = RawRow::new();
    for stat in &entries {
        let Some(name) = stat.get("name").and_then(Value::as_str) else {
            continue;
        };
        let value = stat
            .get("value")
            .cloned()
            .or_else(|| stat.get("displayValue").cloned())
            .unwrap_or(Value::Null);
        row.insert(name.to_lowercase(), value);
    }

    BasketballLine {
        pts: fields::resolve_count(&row, nba::PTS),
        reb: fields::resolve_count(&row, nba::REB),
        ast: fields::resolve_count(&row, nba::AST),
        stl: fields::resolve_count(&row, nba::STL),
        blk: fields::resolve_count(&row, nba::BLK),
        tov: fields::resolve_count(&row, nba::TOV),
        fg3m: fields::resolve_count(&row, nba::FG3M),
        min: fields::resolve_count(&row, nba::MIN),
    }
}

/// Roster players from a team payload. Provider API versions hang the
/// roster off three different paths; all are probed.
fn extract_team_players(payload: &Value, fallback_abbr: &str) -> Vec<PlayerIdentity> {
    let team_abbr = payload
        .pointer("/team/abbreviation")
        .or_else(|| payload.get("abbreviation"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback_abbr)
        .to_string();
    let team = (!team_abbr.is_empty()).then_some(team_abbr);

    let mut players = Vec::new();

    // shape 1: team.roster.entries[].player
    if let Some(entries) = payload.pointer("/team/roster/entries").and_then(Value::as_array) {
        for entry in entries {
            let athlete = entry
                .get("player")
                .or_else(|| entry.get("athlete"))
                .unwrap_or(entry);
            push_roster_player(athlete, Some(entry), team.clone(), &mut players);
        }
    }

    // shape 2: athletes[] position groups with items[]
    if let Some(groups) = payload.get("athletes").and_then(Value::as_array) {
        for group in groups {
            if let Some(items) = group.get("items").and_then(Value::as_array) {
                for athlete in items {
                    push_roster_player(athlete, Some(group), team.clone(), &mut players);
                }
            }
        }
    }

    // shape 3: flat team.athletes[]
    if let Some(athletes) = payload.pointer("/team/athletes").and_then(Value::as_array) {
        for athlete in athletes {
            push_roster_player(athlete, None, team.clone(), &mut players);
        }
    }

    players
}

fn push_roster_player(
    athlete: &Value,
    container: Option<&Value>,
    team: Option<String>,
    out: &mut Vec<PlayerIdentity>,
) {
    let Some(id) = id_of(athlete.get("id")) else {
        return;
    };
    let Some(name) = first_string(athlete, &["displayName", "fullName", "shortName"]) else {
        return;
    };
    let raw_position = athlete
        .pointer("/position/abbreviation")
        .or_else(|| athlete.pointer("/position/name"))
        .or_else(|| container.and_then(|c| c.pointer("/position/abbreviation")))
        .or_else(|| container.and_then(|c| c.pointer("/position/name")))
        .or_else(|| athlete.get("defaultPosition"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    out.push(PlayerIdentity::new(
        format!("nba:{id}"),
        name,
        Position::normalize_basketball(raw_position),
        team,
    ));
}

/// First observation of each id wins.
fn dedup_players(players: &mut Vec<PlayerIdentity>) {
    let mut seen = std::collections::BTreeSet::new();
    players.retain(|player| seen.insert(player.id.clone()));
}

/// Ids arrive as strings or numbers depending on endpoint version.
fn id_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
