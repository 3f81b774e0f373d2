//! Stat lines and the fantasy-point formulas.
//!
//! Scoring is a pure function of (stat line, mode): no hidden state, and a
//! fixed term order so equal inputs produce bit-identical floats. Additive
//! terms accumulate in the order they are declared, then the negative terms
//! are subtracted.

use crate::cli::types::ScoringMode;
use serde::{Deserialize, Serialize};

/// One football player's counting stats for a week. Absent source
/// categories arrive here already defaulted to zero by the field resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootballLine {
    #[serde(rename = "passYds")]
    pub pass_yds: u32,
    #[serde(rename = "passTD")]
    pub pass_td: u32,
    #[serde(rename = "passINT")]
    pub pass_int: u32,
    #[serde(rename = "rushYds")]
    pub rush_yds: u32,
    #[serde(rename = "rushTD")]
    pub rush_td: u32,
    pub rec: u32,
    #[serde(rename = "recYds")]
    pub rec_yds: u32,
    #[serde(rename = "recTD")]
    pub rec_td: u32,
    #[serde(rename = "fumLost")]
    pub fum_lost: u32,
}

/// One basketball player's counting stats for a game date. Minutes are
/// carried for display and never enter the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketballLine {
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub tov: u32,
    pub fg3m: u32,
    pub min: u32,
}

/// Sport-specific stat line attached to a scoring record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatLine {
    Football(FootballLine),
    Basketball(BasketballLine),
}

impl StatLine {
    /// Component-wise sum, used when a box score exposes several stat
    /// sections with no totals tag. Mismatched sports keep the left side.
    pub fn merge_sum(self, other: StatLine) -> StatLine {
        match (self, other) {
            (StatLine::Football(a), StatLine::Football(b)) => StatLine::Football(FootballLine {
                pass_yds: a.pass_yds + b.pass_yds,
                pass_td: a.pass_td + b.pass_td,
                pass_int: a.pass_int + b.pass_int,
                rush_yds: a.rush_yds + b.rush_yds,
                rush_td: a.rush_td + b.rush_td,
                rec: a.rec + b.rec,
                rec_yds: a.rec_yds + b.rec_yds,
                rec_td: a.rec_td + b.rec_td,
                fum_lost: a.fum_lost + b.fum_lost,
            }),
            (StatLine::Basketball(a), StatLine::Basketball(b)) => {
                StatLine::Basketball(BasketballLine {
                    pts: a.pts + b.pts,
                    reb: a.reb + b.reb,
                    ast: a.ast + b.ast,
                    stl: a.stl + b.stl,
                    blk: a.blk + b.blk,
                    tov: a.tov + b.tov,
                    fg3m: a.fg3m + b.fg3m,
                    min: a.min + b.min,
                })
            }
            (line, _) => line,
        }
    }
}

/// Football fantasy points under the given mode.
///
/// Term order is canonical: passing yards/25, passing TD x4, rushing
/// yards/10, receiving yards/10, rushing TD x6, receiving TD x6, the mode's
/// reception bonus, then interceptions x2 and fumbles lost x2 subtracted.
pub fn football_points(line: &FootballLine, mode: ScoringMode) -> f64 {
    let mut points = line.pass_yds as f64 / 25.0;
    points += line.pass_td as f64 * 4.0;
    points += line.rush_yds as f64 / 10.0;
    points += line.rec_yds as f64 / 10.0;
    points += line.rush_td as f64 * 6.0;
    points += line.rec_td as f64 * 6.0;
    points += line.rec as f64 * mode.reception_bonus();
    points -= line.pass_int as f64 * 2.0;
    points -= line.fum_lost as f64 * 2.0;
    points
}

/// Football points, trusting a mode-matching precomputed total from the
/// source when one exists. Precomputed values may round differently but
/// reflect the published boxscore; recomputation from counting stats is the
/// fallback.
pub fn football_points_or_precomputed(
    precomputed: Option<f64>,
    line: &FootballLine,
    mode: ScoringMode,
) -> f64 {
    match precomputed {
        Some(points) if points.is_finite() => points,
        _ => football_points(line, mode),
    }
}

/// Basketball fantasy points: pts + 1.2 reb + 1.5 ast + 3 stl + 3 blk +
/// 0.5 threes, minus turnovers. Minutes never score.
pub fn basketball_points(line: &BasketballLine) -> f64 {
    let mut points = line.pts as f64;
    points += line.reb as f64 * 1.2;
    points += line.ast as f64 * 1.5;
    points += line.stl as f64 * 3.0;
    points += line.blk as f64 * 3.0;
    points += line.fg3m as f64 * 0.5;
    points -= line.tov as f64;
    points
}

/// Points for any stat line under the given mode.
pub fn points_for(line: &StatLine, mode: ScoringMode) -> f64 {
    match line {
        StatLine::Football(fb) => football_points(fb, mode),
        StatLine::Basketball(bb) => basketball_points(bb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_scores_zero_in_every_mode() {
        let line = FootballLine::default();
        for mode in [ScoringMode::Std, ScoringMode::Half, ScoringMode::Ppr] {
            assert_eq!(football_points(&line, mode), 0.0);
        }
        assert_eq!(basketball_points(&BasketballLine::default()), 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let line = FootballLine {
            pass_yds: 287,
            pass_td: 2,
            pass_int: 1,
            rush_yds: 34,
            rec: 3,
            rec_yds: 21,
            ..Default::default()
        };
        let a = football_points(&line, ScoringMode::Half);
        let b = football_points(&line, ScoringMode::Half);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn std_mode_reference_line() {
        // 300/25 + 3*4 - 1*2 = 12 + 12 - 2 = 22.00
        let line = FootballLine {
            pass_yds: 300,
            pass_td: 3,
            pass_int: 1,
            rec: 0,
            ..Default::default()
        };
        assert_eq!(football_points(&line, ScoringMode::Std), 22.0);
    }

    #[test]
    fn reception_bonus_by_mode() {
        let line = FootballLine {
            rec: 8,
            rec_yds: 80,
            ..Default::default()
        };
        assert_eq!(football_points(&line, ScoringMode::Std), 8.0);
        assert_eq!(football_points(&line, ScoringMode::Half), 12.0);
        assert_eq!(football_points(&line, ScoringMode::Ppr), 16.0);
    }

    #[test]
    fn positive_categories_never_decrease_score() {
        let base = FootballLine {
            pass_yds: 100,
            rush_yds: 40,
            rec: 2,
            rec_yds: 15,
            pass_int: 1,
            fum_lost: 1,
            ..Default::default()
        };
        let base_pts = football_points(&base, ScoringMode::Ppr);

        let bumps: [fn(FootballLine) -> FootballLine; 7] = [
            |mut l| {
                l.pass_yds += 25;
                l
            },
            |mut l| {
                l.pass_td += 1;
                l
            },
            |mut l| {
                l.rush_yds += 10;
                l
            },
            |mut l| {
                l.rush_td += 1;
                l
            },
            |mut l| {
                l.rec += 1;
                l
            },
            |mut l| {
                l.rec_yds += 10;
                l
            },
            |mut l| {
                l.rec_td += 1;
                l
            },
        ];
        for bump in bumps {
            assert!(football_points(&bump(base), ScoringMode::Ppr) >= base_pts);
        }
    }

    #[test]
    fn negative_categories_never_increase_score() {
        let base = FootballLine {
            pass_yds: 250,
            pass_td: 2,
            ..Default::default()
        };
        let base_pts = football_points(&base, ScoringMode::Std);

        let mut with_int = base;
        with_int.pass_int += 1;
        assert!(football_points(&with_int, ScoringMode::Std) <= base_pts);

        let mut with_fum = base;
        with_fum.fum_lost += 1;
        assert!(football_points(&with_fum, ScoringMode::Std) <= base_pts);
    }

    #[test]
    fn basketball_formula_weights() {
        let line = BasketballLine {
            pts: 20,
            reb: 10,
            ast: 4,
            stl: 2,
            blk: 1,
            tov: 3,
            fg3m: 2,
            min: 36,
        };
        // 20 + 12 + 6 + 6 + 3 + 1 - 3 = 45
        assert_eq!(basketball_points(&line), 45.0);

        // minutes are informational only
        let mut benched = line;
        benched.min = 0;
        assert_eq!(basketball_points(&benched), basketball_points(&line));
    }

    #[test]
    fn basketball_turnovers_never_help() {
        let base = BasketballLine {
            pts: 15,
            tov: 2,
            ..Default::default()
        };
        let mut worse = base;
        worse.tov += 1;
        assert!(basketball_points(&worse) < basketball_points(&base));
    }

    #[test]
    fn precomputed_total_preferred_over_recompute() {
        let line = FootballLine {
            pass_yds: 300,
            pass_td: 3,
            pass_int: 1,
            ..Default::default()
        };
        // source published 22.02 (its own rounding); trust it
        assert_eq!(
            football_points_or_precomputed(Some(22.02), &line, ScoringMode::Std),
            22.02
        );
        // no precomputed value: recompute from the counting stats
        assert_eq!(
            football_points_or_precomputed(None, &line, ScoringMode::Std),
            22.0
        );
        // a NaN from a junk column falls back to recompute
        assert_eq!(
            football_points_or_precomputed(Some(f64::NAN), &line, ScoringMode::Std),
            22.0
        );
    }

    #[test]
    fn points_for_dispatches_by_sport() {
        let fb = StatLine::Football(FootballLine {
            pass_yds: 300,
            pass_td: 3,
            pass_int: 1,
            ..Default::default()
        });
        assert_eq!(points_for(&fb, ScoringMode::Std), 22.0);

        let bb = StatLine::Basketball(BasketballLine {
            pts: 10,
            tov: 1,
            ..Default::default()
        });
        // basketball ignores the mode entirely
        assert_eq!(points_for(&bb, ScoringMode::Std), points_for(&bb, ScoringMode::Ppr));
        assert_eq!(points_for(&bb, ScoringMode::Ppr), 9.0);
    }

    #[test]
    fn merge_sum_adds_component_wise() {
        let a = StatLine::Basketball(BasketballLine {
            pts: 10,
            reb: 3,
            min: 18,
            ..Default::default()
        });
        let b = StatLine::Basketball(BasketballLine {
            pts: 8,
            reb: 2,
            min: 14,
            ..Default::default()
        });
        match a.merge_sum(b) {
            StatLine::Basketball(sum) => {
                assert_eq!(sum.pts, 18);
                assert_eq!(sum.reb, 5);
                assert_eq!(sum.min, 32);
            }
            _ => panic!("sport changed during merge"),
        }
    }
}
