//! Field resolution over provider-native rows.
//!
//! Upstream schemas rename fields across versions and providers, so every
//! coalescing chain in the pipeline is an ordered synonym list declared here
//! and resolved with first-match-wins semantics. Business logic never reaches
//! into a raw row directly.

use serde_json::Value;
use std::collections::BTreeMap;

/// A provider-native row: semi-structured key-value pairs in the provider's
/// own field names. CSV rows carry string values; JSON rows carry whatever
/// the payload held.
pub type RawRow = BTreeMap<String, Value>;

/// NFL weekly-snapshot column synonyms, in priority order.
pub mod nfl {
    pub const PLAYER_ID: &[&str] = &["player_id", "gsis_id", "gsis_player_id", "gsisid"];
    pub const PLAYER_NAME: &[&str] = &["player_name", "player_display_name", "name"];
    pub const TEAM: &[&str] = &["recent_team", "team", "recent_team_abbr"];
    pub const POSITION: &[&str] = &["position", "position_group"];
    pub const WEEK: &[&str] = &["week"];

    pub const PASS_YDS: &[&str] = &["passing_yards"];
    pub const PASS_TD: &[&str] = &["passing_tds"];
    pub const PASS_INT: &[&str] = &["passing_interceptions", "interceptions"];
    pub const RUSH_YDS: &[&str] = &["rushing_yards"];
    pub const RUSH_TD: &[&str] = &["rushing_tds"];
    pub const REC: &[&str] = &["receptions"];
    pub const REC_YDS: &[&str] = &["receiving_yards"];
    pub const REC_TD: &[&str] = &["receiving_tds"];
    pub const FUM_LOST: &[&str] = &["fumbles_lost", "fumbles"];

    /// Upstream-precomputed totals, one column per scoring mode.
    pub const FP_STD: &[&str] = &["fantasy_points"];
    pub const FP_HALF: &[&str] = &["fantasy_points_half_ppr"];
    pub const FP_PPR: &[&str] = &["fantasy_points_ppr"];
}

/// NBA box-score stat-name synonyms (section entries are lowercased before
/// lookup), in priority order.
pub mod nba {
    pub const PTS: &[&str] = &["points", "pts"];
    pub const REB: &[&str] = &["totreb", "rebounds", "reb"];
    pub const AST: &[&str] = &["assists", "ast"];
    pub const STL: &[&str] = &["steals", "stl"];
    pub const BLK: &[&str] = &["blocks", "blk"];
    pub const TOV: &[&str] = &["turnovers", "to", "tov"];
    pub const FG3M: &[&str] = &["threepointersmade", "3ptm", "fg3m"];
    pub const MIN: &[&str] = &["minutes", "min"];
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Resolve a canonical field from a raw row: the synonym list is walked in
/// its declared order and the first present-and-non-empty value wins,
/// regardless of the row's own key ordering. `None` means absent — the
/// caller decides whether absent means zero or means exclude.
pub fn resolve<'a>(row: &'a RawRow, synonyms: &[&str]) -> Option<&'a Value> {
    synonyms
        .iter()
        .find_map(|key| row.get(*key).filter(|v| is_present(v)))
}

/// Resolve a field as a string slice, if present.
pub fn resolve_str<'a>(row: &'a RawRow, synonyms: &[&str]) -> Option<&'a str> {
    resolve(row, synonyms).and_then(Value::as_str)
}

/// Resolve a field as an f64 if it is present and numeric. Strings are
/// parsed (CSV rows arrive stringly-typed). Non-numeric text is `None`.
pub fn resolve_f64(row: &RawRow, synonyms: &[&str]) -> Option<f64> {
    numeric(resolve(row, synonyms)?)
}

/// Resolve a counting stat for scoring: absent or non-numeric coerces to 0,
/// and negative source values clamp to 0. Unset stat categories contribute
/// nothing to a fantasy formula, so this is policy, not data loss.
pub fn resolve_count(row: &RawRow, synonyms: &[&str]) -> u32 {
    resolve_f64(row, synonyms)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.round() as u32)
        .unwrap_or(0)
}

/// Numeric view of a value: numbers pass through, numeric strings parse,
/// everything else is `None`.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Numeric coercion for scoring purposes: absent/non-numeric becomes 0.
pub fn numeric_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(numeric).filter(|n| n.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn synonym_precedence_follows_declared_order() {
        // The row's own (BTreeMap) ordering would put gsis_id first; the
        // declared priority list puts player_id first and must win.
        let r = row(&[
            ("gsis_id", json!("00-0099999")),
            ("player_id", json!("00-0011111")),
        ]);
        assert_eq!(
            resolve_str(&r, nfl::PLAYER_ID),
            Some("00-0011111"),
            "first synonym in the declared list wins"
        );
    }

    #[test]
    fn empty_string_counts_as_absent() {
        let r = row(&[("player_id", json!("")), ("gsis_id", json!("00-0022222"))]);
        assert_eq!(resolve_str(&r, nfl::PLAYER_ID), Some("00-0022222"));
    }

    #[test]
    fn null_counts_as_absent() {
        let r = row(&[("passing_yards", Value::Null)]);
        assert_eq!(resolve(&r, nfl::PASS_YDS), None);
        assert_eq!(resolve_count(&r, nfl::PASS_YDS), 0);
    }

    #[test]
    fn absent_is_none_not_zero() {
        let r = row(&[("week", json!("3"))]);
        assert_eq!(resolve_f64(&r, nfl::PASS_YDS), None);
    }

    #[test]
    fn count_coercion_policy() {
        let r = row(&[
            ("receptions", json!("5")),
            ("passing_yards", json!("not-a-number")),
            ("rushing_yards", json!(-7)),
            ("receiving_yards", json!(88.6)),
        ]);
        assert_eq!(resolve_count(&r, nfl::REC), 5);
        // non-numeric coerces to 0 for scoring
        assert_eq!(resolve_count(&r, nfl::PASS_YDS), 0);
        // negative source values clamp to 0 (stat lines are non-negative)
        assert_eq!(resolve_count(&r, nfl::RUSH_YDS), 0);
        assert_eq!(resolve_count(&r, nfl::REC_YDS), 89);
    }

    #[test]
    fn numeric_handles_strings_and_numbers() {
        assert_eq!(numeric(&json!(12.5)), Some(12.5));
        assert_eq!(numeric(&json!("12.5")), Some(12.5));
        assert_eq!(numeric(&json!(" 3 ")), Some(3.0));
        assert_eq!(numeric(&json!("n/a")), None);
        assert_eq!(numeric(&json!(true)), None);
        assert_eq!(numeric_or_zero(None), 0.0);
    }

    #[test]
    fn interception_fallback_synonym() {
        let r = row(&[("interceptions", json!("2"))]);
        assert_eq!(resolve_count(&r, nfl::PASS_INT), 2);

        // the newer column name shadows the legacy one when both exist
        let r = row(&[
            ("interceptions", json!("2")),
            ("passing_interceptions", json!("1")),
        ]);
        assert_eq!(resolve_count(&r, nfl::PASS_INT), 1);
    }
}
