//! Football scoring mode variants.

use crate::error::PickemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reception scoring variant for football. Basketball has a single fixed
/// formula and ignores the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Std,
    Half,
    Ppr,
}

impl ScoringMode {
    /// Points per reception contributed by this mode.
    pub fn reception_bonus(&self) -> f64 {
        match self {
            ScoringMode::Std => 0.0,
            ScoringMode::Half => 0.5,
            ScoringMode::Ppr => 1.0,
        }
    }
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Ppr
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringMode::Std => "std",
            ScoringMode::Half => "half",
            ScoringMode::Ppr => "ppr",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ScoringMode {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "std" | "standard" => Ok(ScoringMode::Std),
            "half" | "half-ppr" | "half_ppr" => Ok(ScoringMode::Half),
            "ppr" | "full-ppr" | "full_ppr" => Ok(ScoringMode::Ppr),
            other => Err(PickemError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_aliases_parse() {
        assert_eq!("std".parse::<ScoringMode>().unwrap(), ScoringMode::Std);
        assert_eq!("standard".parse::<ScoringMode>().unwrap(), ScoringMode::Std);
        assert_eq!("half-ppr".parse::<ScoringMode>().unwrap(), ScoringMode::Half);
        assert_eq!("PPR".parse::<ScoringMode>().unwrap(), ScoringMode::Ppr);
        assert!("double".parse::<ScoringMode>().is_err());
    }

    #[test]
    fn reception_bonus_per_mode() {
        assert_eq!(ScoringMode::Std.reception_bonus(), 0.0);
        assert_eq!(ScoringMode::Half.reception_bonus(), 0.5);
        assert_eq!(ScoringMode::Ppr.reception_bonus(), 1.0);
    }
}
