//! Merging repeated player observations into one record per identity.
//!
//! Duplicate observations show up constantly: multiple stat sections in one
//! box score, multiple games on a slate, duplicate weekly pulls, multi-team
//! stints. The aggregator keys on provider id (synthesized from name+team
//! when the provider id is missing) and applies a configurable merge policy.
//! Merging is commutative and idempotent with respect to arrival order, so
//! concurrent fetch completion order never changes the result.

use crate::cli::types::{Period, Position};
use crate::scoring::StatLine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player as the pipeline identifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Provider-namespaced id (e.g. `nba:1234`, a GSIS id) or a synthesized
    /// `synth:` key when the provider supplied none.
    pub id: String,
    pub name: String,
    #[serde(rename = "pos")]
    pub position: Position,
    pub team: Option<String>,
}

impl PlayerIdentity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        team: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            team,
        }
    }

    /// Identity for a row with no provider id, keyed on the stable
    /// (name, team) tuple. The `synth:` namespace keeps these from ever
    /// colliding with a real provider id, so two distinct people are never
    /// silently merged into one.
    pub fn synthesized(name: impl Into<String>, position: Position, team: Option<String>) -> Self {
        let name = name.into();
        let id = format!(
            "synth:{}:{}",
            name.to_lowercase(),
            team.as_deref().unwrap_or("-").to_lowercase()
        );
        Self {
            id,
            name,
            position,
            team,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.id.starts_with("synth:")
    }
}

/// One player's merged result for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub player: PlayerIdentity,
    pub period: Period,
    pub points: f64,
    #[serde(rename = "statLine")]
    pub line: StatLine,
}

/// How duplicate observations of the same (player, period) combine.
///
/// `MaxPoints` is the default: duplicate rows within one week usually come
/// from repeated pulls or multi-team stints, and the higher figure reflects
/// the validated final boxscore rather than a transient partial one. A
/// mid-week trade can legitimately produce two stat lines for one player,
/// so the policy stays configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    MaxPoints,
    SumPoints,
}

/// Accumulates observations and yields one record per player identity.
#[derive(Debug)]
pub struct Aggregator {
    policy: MergePolicy,
    records: BTreeMap<String, ScoringRecord>,
}

impl Aggregator {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            records: BTreeMap::new(),
        }
    }

    /// Fold one observation in. Same-key observations merge under the
    /// configured policy; max-merge keeps the whole higher-scoring record so
    /// the surviving stat line matches the surviving point total.
    pub fn observe(&mut self, record: ScoringRecord) {
        let key = record.player.id.clone();
        match self.records.entry(key) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                match self.policy {
                    MergePolicy::MaxPoints => {
                        if record.points > existing.points {
                            *existing = record;
                        }
                    }
                    MergePolicy::SumPoints => {
                        existing.line = existing.line.merge_sum(record.line);
                        existing.points += record.points;
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All merged records keyed by player id.
    pub fn into_records(self) -> BTreeMap<String, ScoringRecord> {
        self.records
    }

    /// Records in presentation order: points descending, ties broken by
    /// player name ascending (case-folded).
    pub fn into_sorted(self) -> Vec<ScoringRecord> {
        let mut records: Vec<ScoringRecord> = self.records.into_values().collect();
        sort_for_presentation(&mut records);
        records
    }
}

/// Points descending, then name ascending (case-folded comparison stands in
/// for locale collation).
pub fn sort_for_presentation(records: &mut [ScoringRecord]) {
    records.sort_by(|a, b| {
        b.points
            .partial_cmp(&a.points)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.player
                    .name
                    .to_lowercase()
                    .cmp(&b.player.name.to_lowercase())
            })
    });
}
