//! Roster positions and free-text position normalization.

use crate::cli::types::time::Sport;
use crate::error::PickemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roster slots across both sports.
///
/// Football pick'em slots are QB/RB/WR/TE; basketball slots are C/PF/SF/SG/PG.
/// `F` and `G` are the generic forward/guard forms some feeds report instead
/// of a specific slot; they are kept rather than guessed into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    C,
    PF,
    SF,
    SG,
    PG,
    F,
    G,
}

impl Position {
    /// The football positions admitted into the pick'em pool.
    pub const FOOTBALL_POOL: [Position; 4] =
        [Position::QB, Position::RB, Position::WR, Position::TE];

    pub fn sport(&self) -> Sport {
        match self {
            Position::QB | Position::RB | Position::WR | Position::TE => Sport::Nfl,
            _ => Sport::Nba,
        }
    }

    /// Parse a football position string from a stats feed. Feeds disagree on
    /// casing; anything outside the pool positions is excluded (`None`), not
    /// an error — kickers, linemen, and defensive rows are simply filtered.
    pub fn parse_football(raw: &str) -> Option<Position> {
        match raw.trim().to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            _ => None,
        }
    }

    /// Normalize a free-text basketball position into the closed enum.
    ///
    /// Upstream feeds are inconsistent about abbreviation vs. full-name forms
    /// ("PG", "Point Guard", "POINT GUARD"), so this matches by keyword and
    /// falls back to generic guard rather than failing on an unmapped value.
    pub fn normalize_basketball(raw: &str) -> Position {
        let p = raw.trim().to_uppercase();
        match p.as_str() {
            "C" => return Position::C,
            "PF" => return Position::PF,
            "SF" => return Position::SF,
            "SG" => return Position::SG,
            "PG" => return Position::PG,
            "F" => return Position::F,
            "G" => return Position::G,
            _ => {}
        }
        if p.contains("CENTER") {
            Position::C
        } else if p.contains("POINT") {
            Position::PG
        } else if p.contains("SHOOT") || p.contains("SG") {
            Position::SG
        } else if p.contains("POWER") || p.contains("PF") {
            Position::PF
        } else if p.contains("SMALL") || p.contains("SF") {
            Position::SF
        } else if p.contains("FORWARD") {
            Position::F
        } else {
            Position::G
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::C => "C",
            Position::PF => "PF",
            Position::SF => "SF",
            Position::SG => "SG",
            Position::PG => "PG",
            Position::F => "F",
            Position::G => "G",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Position {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "C" => Ok(Position::C),
            "PF" => Ok(Position::PF),
            "SF" => Ok(Position::SF),
            "SG" => Ok(Position::SG),
            "PG" => Ok(Position::PG),
            "F" => Ok(Position::F),
            "G" => Ok(Position::G),
            other => Err(PickemError::InvalidPosition {
                position: other.to_string(),
            }),
        }
    }
}
