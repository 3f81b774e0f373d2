//! Season, week, and period types for the pick'em scoring cycle.

use crate::error::{PickemError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regular-season week cap used by the period resolver and probing.
pub const MAX_REGULAR_WEEK: u16 = 18;

/// Absolute week cap including postseason snapshots.
pub const MAX_WEEK: u16 = 22;

/// Type-safe wrapper for season years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    pub fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn prev(&self) -> Self {
        Self(self.0 - 1)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.parse()?))
    }
}

/// Type-safe wrapper for week numbers (1..=18 regular season, up to 22 with
/// postseason).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week(pub u16);

impl Week {
    pub fn new(week: u16) -> Self {
        Self(week)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Validate a caller-pinned week. Explicit weeks are accepted through the
    /// postseason cap; only the resolver/probe clamp at 18.
    pub fn validate(&self) -> Result<Self> {
        if self.0 < 1 || self.0 > MAX_WEEK {
            return Err(PickemError::InvalidPeriod(format!(
                "week must be between 1 and {MAX_WEEK}, got {}",
                self.0
            )));
        }
        Ok(*self)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Week {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.parse()?))
    }
}

/// Which sport a request targets. Determines the period shape, the source
/// adapter, and the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nfl,
    Nba,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Nfl => write!(f, "nfl"),
            Sport::Nba => write!(f, "nba"),
        }
    }
}

impl FromStr for Sport {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nfl" | "football" => Ok(Sport::Nfl),
            "nba" | "basketball" => Ok(Sport::Nba),
            other => Err(PickemError::InvalidSport {
                sport: other.to_string(),
            }),
        }
    }
}

/// The scoring-cycle unit: (season, week) for football, a calendar date for
/// basketball. Computed fresh per request; never persisted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week { season: Season, week: Week },
    Date { date: NaiveDate },
}

impl Period {
    pub fn week(season: Season, week: Week) -> Self {
        Period::Week { season, week }
    }

    pub fn date(date: NaiveDate) -> Self {
        Period::Date { date }
    }

    pub fn sport(&self) -> Sport {
        match self {
            Period::Week { .. } => Sport::Nfl,
            Period::Date { .. } => Sport::Nba,
        }
    }

    /// The `YYYYMMDD` form the scoreboard API expects.
    pub fn compact_date(&self) -> Option<String> {
        match self {
            Period::Date { date } => Some(date.format("%Y%m%d").to_string()),
            Period::Week { .. } => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week { season, week } => write!(f, "{season} week {week}"),
            Period::Date { date } => write!(f, "{date}"),
        }
    }
}
