//! Command implementations for the pick'em stats CLI.

pub mod period;
pub mod player_pool;
pub mod snapshot;

use crate::cli::types::{Period, Sport};
use crate::cli::CommonFilters;
use crate::error::Result;
use chrono::Utc;

/// Resolve the target period from the common filters: explicit season/week
/// or date when given, the computed current period otherwise.
pub fn resolve_period(filters: &CommonFilters) -> Result<Period> {
    match filters.sport {
        Sport::Nfl => {
            let (current_season, current_week) =
                match crate::period::current_period(Sport::Nfl, Utc::now()) {
                    Period::Week { season, week } => (season, week),
                    Period::Date { .. } => unreachable!("football periods are week-shaped"),
                };
            let season = filters.season.unwrap_or(current_season);
            let week = filters.week.unwrap_or(current_week).validate()?;
            Ok(Period::week(season, week))
        }
        Sport::Nba => {
            let date = filters
                .date
                .unwrap_or_else(|| crate::period::reference_date(Utc::now()));
            Ok(Period::date(date))
        }
    }
}
