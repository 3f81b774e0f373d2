//! Period resolution: which (season, week) or date is "current", and
//! backward probing for the latest period that actually has data.

use crate::cli::types::time::MAX_REGULAR_WEEK;
use crate::cli::types::{Period, Season, Sport, Week};
use crate::config::SourceConfig;
use crate::error::{PickemError, Result};
use crate::sources::nfl;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use tracing::debug;

/// Reference offset for the basketball "today" default. A fixed UTC-5 keeps
/// the slate date stable for all users regardless of device timezone; civil
/// Eastern DST tracking is deliberately not attempted.
const NBA_REFERENCE_OFFSET_SECS: i32 = 5 * 3600;

/// Compute the current period for a sport from a UTC instant.
///
/// Football weeks change at most weekly, so callers are encouraged to cache
/// this result with an hourly TTL (see the CLI cache layer).
pub fn current_period(sport: Sport, now: DateTime<Utc>) -> Period {
    match sport {
        Sport::Nfl => football_period(now),
        Sport::Nba => Period::date(reference_date(now)),
    }
}

/// Season + week for a UTC instant. Season year flips in September; week 1
/// starts exactly at kickoff, and instants before kickoff roll back to the
/// prior season (clamped to its final regular week).
pub fn football_period(now: DateTime<Utc>) -> Period {
    let year = now.year();
    let season = if now.month() >= 9 { year } else { year - 1 };

    let ko = kickoff(season);
    if now < ko {
        let prior = season - 1;
        return week_period(now, kickoff(prior), prior);
    }
    week_period(now, ko, season)
}

/// "Today" in the fixed reference offset.
pub fn reference_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&FixedOffset::west_opt(NBA_REFERENCE_OFFSET_SECS).expect("valid offset"))
        .date_naive()
}

/// Season kickoff: the first Thursday strictly after the first Monday of
/// September, at midnight UTC. All arithmetic stays in the UTC calendar so
/// DST never shifts the boundary.
pub fn kickoff(season_year: i32) -> DateTime<Utc> {
    let sep_first = NaiveDate::from_ymd_opt(season_year, 9, 1).expect("september exists");
    let dow = sep_first.weekday().num_days_from_sunday(); // 0=Sun..6=Sat
    let to_monday = if dow == 1 { 0 } else { (8 - dow) % 7 };
    let first_monday = sep_first + chrono::Days::new(to_monday as u64);

    let mon_dow = first_monday.weekday().num_days_from_sunday();
    let mut to_thursday = (4 + 7 - mon_dow) % 7;
    if to_thursday == 0 {
        to_thursday = 7; // strictly after
    }
    let thursday = first_monday + chrono::Days::new(to_thursday as u64);
    thursday.and_hms_opt(0, 0, 0).expect("midnight").and_utc()
}

fn week_period(now: DateTime<Utc>, ko: DateTime<Utc>, season_year: i32) -> Period {
    let elapsed = (now - ko).num_seconds();
    let week = elapsed.div_euclid(7 * 24 * 3600) + 1;
    let week = week.clamp(1, MAX_REGULAR_WEEK as i64) as u16;
    Period::week(Season::new(season_year as u16), Week::new(week))
}

/// Walk backward from the latest plausible week, season by season across the
/// configured candidates, until a week with nonzero player coverage is
/// found. Seasons whose snapshot cannot be fetched at all are skipped, not
/// fatal; exhausting every candidate is [`PickemError::NoDataFound`] —
/// distinct from a transport failure.
pub async fn find_latest_period(config: &SourceConfig) -> Result<Period> {
    let client = config.client()?;
    let mut probed = 0usize;

    for season in &config.probe_seasons {
        let snapshot = match nfl::fetch_season_snapshot(config, &client, *season).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(season = season.as_u16(), %err, "probe: season snapshot unavailable");
                probed += MAX_REGULAR_WEEK as usize;
                continue;
            }
        };
        for week in (1..=MAX_REGULAR_WEEK).rev() {
            probed += 1;
            let week = Week::new(week);
            if nfl::week_rows(&snapshot.rows, week).next().is_some() {
                return Ok(Period::week(snapshot.season_used, week));
            }
        }
    }

    Err(PickemError::NoDataFound { probed })
}
