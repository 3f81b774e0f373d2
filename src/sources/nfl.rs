//! Football source adapter: season-wide weekly-stats CSV snapshots.
//!
//! The snapshot lives at a handful of mirror URLs that come and go as the
//! upstream project reorganizes its releases. Candidates are tried in
//! priority order and the first success wins; only when every candidate
//! fails does the fetch surface `SourceUnavailable` with the full attempt
//! log.

use crate::aggregate::PlayerIdentity;
use crate::cli::types::{Position, ScoringMode, Season, Week};
use crate::config::SourceConfig;
use crate::error::{PickemError, Result};
use crate::fields::{self, nfl, RawRow};
use crate::scoring::FootballLine;
use crate::sources::http;
use flate2::read::GzDecoder;
use reqwest::Client;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, warn};

/// One candidate snapshot URL with its advertised compression.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub url: String,
    pub gz: bool,
}

/// A fetched and parsed season snapshot.
#[derive(Debug)]
pub struct SeasonSnapshot {
    pub rows: Vec<RawRow>,
    /// URL the data actually came from.
    pub resolved_from: String,
    /// Season the data covers — differs from the request when the
    /// future-season fallback kicked in.
    pub season_used: Season,
    pub bytes: usize,
    pub warnings: Vec<String>,
}

/// Candidate URLs for a season, in priority order: the raw-data mirror
/// first, then each release base with plain and gzipped variants.
pub fn candidate_urls(config: &SourceConfig, season: Season) -> Vec<Candidate> {
    let mut candidates = vec![Candidate {
        url: format!("{}/player_stats_{}.csv.gz", config.nfl_raw_base, season),
        gz: true,
    }];
    for base in &config.nfl_release_bases {
        candidates.push(Candidate {
            url: format!("{base}/stats_player_week_{season}.csv"),
            gz: false,
        });
        candidates.push(Candidate {
            url: format!("{base}/stats_player_week_{season}.csv.gz"),
            gz: true,
        });
    }
    candidates
}

/// Fetch the weekly-stats snapshot for a season, trying each candidate in
/// order. A candidate that fetches but fails to parse counts as a failed
/// candidate (malformed payloads are tried past, not fatal).
pub async fn fetch_season_snapshot(
    config: &SourceConfig,
    client: &Client,
    season: Season,
) -> Result<SeasonSnapshot> {
    let candidates = candidate_urls(config, season);
    let mut attempts: Vec<String> = Vec::new();

    for candidate in &candidates {
        let raw = match http::fetch_bytes(client, &candidate.url).await {
            Ok(raw) => raw,
            Err(err) => {
                attempts.push(format!("- {}: {}", candidate.url, err));
                continue;
            }
        };
        let bytes = raw.len();
        let body = match decode_body(&candidate.url, raw, candidate.gz) {
            Ok(body) => body,
            Err(err) => {
                attempts.push(format!("- {}: {}", candidate.url, err));
                continue;
            }
        };
        match parse_csv(&candidate.url, &body) {
            Ok(rows) => {
                debug!(url = %candidate.url, rows = rows.len(), "season snapshot parsed");
                return Ok(SeasonSnapshot {
                    rows,
                    resolved_from: candidate.url.clone(),
                    season_used: season,
                    bytes,
                    warnings: Vec::new(),
                });
            }
            Err(err) => {
                attempts.push(format!("- {}: {}", candidate.url, err));
            }
        }
    }

    Err(PickemError::SourceUnavailable {
        period: format!("{season} season"),
        attempts,
    })
}

/// Like [`fetch_season_snapshot`], but a season newer than the newest
/// known-published one falls back to the previous season once, noting the
/// substitution as a warning. Keeps early-September requests for the new
/// season working before its first data drop. Past seasons never fall back:
/// a mirror outage must not quietly serve the wrong season's stats.
pub async fn fetch_season_snapshot_with_fallback(
    config: &SourceConfig,
    client: &Client,
    season: Season,
) -> Result<SeasonSnapshot> {
    match fetch_season_snapshot(config, client, season).await {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => {
            let newest_known = config.probe_seasons.iter().copied().max();
            if !newest_known.map_or(false, |newest| season > newest) {
                return Err(err);
            }
            warn!(season = season.as_u16(), %err, "season snapshot unavailable, trying prior season");
            let mut snapshot =
                fetch_season_snapshot(config, client, season.prev()).await.map_err(|_| err)?;
            snapshot.warnings.push(format!(
                "season {season} has no published snapshot yet; using {}",
                snapshot.season_used
            ));
            Ok(snapshot)
        }
    }
}

/// True when the payload carries the gzip magic prefix.
fn looks_gzipped(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Decompress when the payload is actually gzip-framed. The URL's `.gz`
/// suffix is a hint only: valid gzip always carries the magic prefix, so a
/// flagged payload without it is mislabeled content-encoding and passes
/// through as plain text.
fn decode_body(url: &str, raw: Vec<u8>, gz_flag: bool) -> Result<Vec<u8>> {
    if looks_gzipped(&raw) {
        let mut decoder = GzDecoder::new(raw.as_slice());
        let mut body = Vec::new();
        decoder
            .read_to_end(&mut body)
            .map_err(|err| PickemError::malformed(url, "gzip", err.to_string()))?;
        return Ok(body);
    }
    if gz_flag {
        debug!(url, "gz-flagged payload without gzip magic, treating as plain");
    }
    Ok(raw)
}

/// Parse a CSV body into header-keyed rows. Values stay as strings; the
/// field resolver handles numeric coercion.
fn parse_csv(url: &str, body: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(body);
    let headers = reader
        .headers()
        .map_err(|err| PickemError::malformed(url, "CSV", err.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(PickemError::malformed(url, "CSV", "no header row"));
    }
    // A stats snapshot must at least identify players and weeks; anything
    // else (an HTML error page, a release listing) is a malformed candidate.
    let recognizable = headers
        .iter()
        .any(|header| nfl::PLAYER_ID.contains(&header) || nfl::WEEK.contains(&header));
    if !recognizable {
        return Err(PickemError::malformed(
            url,
            "CSV",
            "no recognizable stat columns in header",
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| PickemError::malformed(url, "CSV", err.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// The pick'em position of a row, if it belongs in the pool at all.
pub fn row_position(row: &RawRow) -> Option<Position> {
    Position::parse_football(fields::resolve_str(row, nfl::POSITION)?)
}

/// Rows for one week, restricted to pool positions.
pub fn week_rows<'a>(rows: &'a [RawRow], week: Week) -> impl Iterator<Item = &'a RawRow> {
    let week = week.as_u16() as f64;
    rows.iter().filter(move |row| {
        fields::resolve_f64(row, nfl::WEEK) == Some(week) && row_position(row).is_some()
    })
}

/// Pool rows across the whole season, restricted to pool positions.
pub fn season_rows<'a>(rows: &'a [RawRow]) -> impl Iterator<Item = &'a RawRow> {
    rows.iter().filter(|row| row_position(row).is_some())
}

/// Player identity for a row. Provider id wins; a row with a name but no id
/// gets a synthesized (name, team) identity; a row with neither is
/// unidentifiable (`None`) and the caller counts it as skipped.
pub fn row_identity(row: &RawRow) -> Option<PlayerIdentity> {
    let position = row_position(row)?;
    let team = fields::resolve_str(row, nfl::TEAM).map(str::to_string);
    let name = fields::resolve_str(row, nfl::PLAYER_NAME);

    if let Some(id) = fields::resolve_str(row, nfl::PLAYER_ID) {
        return Some(PlayerIdentity::new(
            id,
            name.unwrap_or("Unknown"),
            position,
            team,
        ));
    }
    name.map(|name| PlayerIdentity::synthesized(name, position, team))
}

/// Stat line from a row, with the resolver's defaulting (absent → 0).
pub fn row_stat_line(row: &RawRow) -> FootballLine {
    FootballLine {
        pass_yds: fields::resolve_count(row, nfl::PASS_YDS),
        pass_td: fields::resolve_count(row, nfl::PASS_TD),
        pass_int: fields::resolve_count(row, nfl::PASS_INT),
        rush_yds: fields::resolve_count(row, nfl::RUSH_YDS),
        rush_td: fields::resolve_count(row, nfl::RUSH_TD),
        rec: fields::resolve_count(row, nfl::REC),
        rec_yds: fields::resolve_count(row, nfl::REC_YDS),
        rec_td: fields::resolve_count(row, nfl::REC_TD),
        fum_lost: fields::resolve_count(row, nfl::FUM_LOST),
    }
}

/// Upstream-precomputed fantasy total for the requested mode, if the
/// snapshot carries the matching column.
pub fn row_precomputed_points(row: &RawRow, mode: ScoringMode) -> Option<f64> {
    let synonyms = match mode {
        ScoringMode::Std => nfl::FP_STD,
        ScoringMode::Half => nfl::FP_HALF,
        ScoringMode::Ppr => nfl::FP_PPR,
    };
    fields::resolve_f64(row, synonyms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
player_id,player_name,recent_team,position,week,passing_yards,passing_tds,passing_interceptions,receptions,receiving_yards,fantasy_points_ppr
00-0034796,J.Allen,BUF,QB,1,297,3,1,0,0,25.38
00-0036322,J.Chase,CIN,WR,1,0,0,0,6,129,24.9
00-0036322,J.Chase,CIN,WR,2,0,0,0,9,81,26.1
00-0099999,L.Tackle,CIN,OL,1,0,0,0,0,0,0
";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn candidate_order_raw_base_first() {
        let cfg = SourceConfig::default();
        let candidates = candidate_urls(&cfg, Season::new(2024));
        assert_eq!(candidates.len(), 5);
        assert!(candidates[0].url.contains("player_stats_2024.csv.gz"));
        assert!(candidates[0].gz);
        assert!(candidates[1].url.ends_with("stats_player_week_2024.csv"));
        assert!(!candidates[1].gz);
        assert!(candidates[4].url.ends_with("stats_player_week_2024.csv.gz"));
    }

    #[test]
    fn gzip_magic_sniff_overrides_flag() {
        let gz_body = gzip(SAMPLE_CSV.as_bytes());
        // magic present, flag absent: still decompressed
        let plain = decode_body("test://x.csv", gz_body, false).unwrap();
        assert_eq!(plain, SAMPLE_CSV.as_bytes());

        // flag present, magic absent: mislabeled, passed through as plain
        let body = decode_body("test://x.csv.gz", SAMPLE_CSV.as_bytes().to_vec(), true).unwrap();
        assert_eq!(body, SAMPLE_CSV.as_bytes());
    }

    #[test]
    fn csv_rows_keyed_by_header() {
        let rows = parse_csv("test://x.csv", SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["player_name"], Value::String("J.Allen".to_string()));
        assert_eq!(rows[0]["passing_yards"], Value::String("297".to_string()));
    }

    #[test]
    fn week_rows_filter_week_and_position() {
        let rows = parse_csv("test://x.csv", SAMPLE_CSV.as_bytes()).unwrap();
        // week 1 has three rows but the offensive lineman is not poolable
        let week1: Vec<_> = week_rows(&rows, Week::new(1)).collect();
        assert_eq!(week1.len(), 2);
        let week2: Vec<_> = week_rows(&rows, Week::new(2)).collect();
        assert_eq!(week2.len(), 1);
        assert!(week_rows(&rows, Week::new(9)).next().is_none());
    }

    #[test]
    fn identity_prefers_provider_id() {
        let rows = parse_csv("test://x.csv", SAMPLE_CSV.as_bytes()).unwrap();
        let identity = row_identity(&rows[0]).unwrap();
        assert_eq!(identity.id, "00-0034796");
        assert_eq!(identity.name, "J.Allen");
        assert_eq!(identity.position, Position::QB);
        assert_eq!(identity.team.as_deref(), Some("BUF"));
        assert!(!identity.is_synthesized());
    }

    #[test]
    fn identity_synthesized_when_id_missing() {
        let mut row = RawRow::new();
        row.insert("player_name".into(), Value::String("A.Nobody".into()));
        row.insert("recent_team".into(), Value::String("DEN".into()));
        row.insert("position".into(), Value::String("RB".into()));
        let identity = row_identity(&row).unwrap();
        assert!(identity.is_synthesized());
        assert_eq!(identity.name, "A.Nobody");

        // no id and no name: unidentifiable
        let mut row = RawRow::new();
        row.insert("position".into(), Value::String("RB".into()));
        assert!(row_identity(&row).is_none());
    }

    #[test]
    fn stat_line_defaults_absent_to_zero() {
        let rows = parse_csv("test://x.csv", SAMPLE_CSV.as_bytes()).unwrap();
        let line = row_stat_line(&rows[0]);
        assert_eq!(line.pass_yds, 297);
        assert_eq!(line.pass_td, 3);
        assert_eq!(line.pass_int, 1);
        // columns missing from the snapshot entirely
        assert_eq!(line.rush_yds, 0);
        assert_eq!(line.fum_lost, 0);
    }

    #[test]
    fn precomputed_column_by_mode() {
        let rows = parse_csv("test://x.csv", SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(
            row_precomputed_points(&rows[0], ScoringMode::Ppr),
            Some(25.38)
        );
        // snapshot only carries the PPR column
        assert_eq!(row_precomputed_points(&rows[0], ScoringMode::Std), None);
        assert_eq!(row_precomputed_points(&rows[0], ScoringMode::Half), None);
    }
}
