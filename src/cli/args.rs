//! CLI argument definitions and parsing structures.

use super::types::{ScoringMode, Season, Sport, Week};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Common period/mode arguments shared between commands
#[derive(Debug, Args)]
pub struct CommonFilters {
    /// Sport to query: nfl or nba.
    #[clap(long, short, default_value_t = Sport::Nfl)]
    pub sport: Sport,

    /// Season year (football). Defaults to the current season.
    #[clap(long, short = 'S')]
    pub season: Option<Season>,

    /// Week 1-22 (football). Defaults to the current week.
    #[clap(long, short)]
    pub week: Option<Week>,

    /// Slate date YYYY-MM-DD (basketball). Defaults to today in the
    /// reference timezone.
    #[clap(long, short)]
    pub date: Option<NaiveDate>,

    /// Scoring mode: std, half, or ppr (football only).
    #[clap(long, short, default_value_t = ScoringMode::default())]
    pub mode: ScoringMode,
}

#[derive(Debug, Parser)]
#[clap(name = "pickem-stats", about = "Fantasy pick'em stats pipeline CLI")]
pub struct Pickem {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get data from the upstream stat providers
    Get {
        #[clap(subcommand)]
        cmd: GetCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum GetCmd {
    /// Get per-player stat lines and fantasy points for a period.
    ///
    /// Fetches the provider snapshot (weekly CSV for football, box scores
    /// for basketball), normalizes it, and scores every poolable player.
    Snapshot {
        #[clap(flatten)]
        filters: CommonFilters,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,

        /// Print fetch provenance (source URL, row counts) to stderr.
        #[clap(long)]
        debug: bool,

        /// Force refresh from the provider even if a cached snapshot exists.
        #[clap(long)]
        refresh: bool,
    },

    /// Get the selectable player pool for a period.
    ///
    /// Football pools cover the whole season by default so bye-week and
    /// injured players still appear on position-locked pick screens.
    PlayerPool {
        #[clap(flatten)]
        filters: CommonFilters,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,

        /// Restrict a football pool to players with rows in the requested
        /// week.
        #[clap(long)]
        week_scoped: bool,

        /// Force refresh from the provider even if a cached pool exists.
        #[clap(long)]
        refresh: bool,
    },

    /// Compute the current period (season + week, or slate date).
    CurrentPeriod {
        /// Sport to resolve: nfl or nba.
        #[clap(long, short, default_value_t = Sport::Nfl)]
        sport: Sport,

        /// Output as JSON instead of a text line.
        #[clap(long)]
        json: bool,

        /// Recompute instead of using the hourly cached value.
        #[clap(long)]
        refresh: bool,
    },

    /// Find the latest football period with populated data.
    ///
    /// Walks backward week-by-week within each candidate season until a
    /// week with nonzero player coverage turns up.
    FindPeriod {
        /// Output as JSON instead of a text line.
        #[clap(long)]
        json: bool,
    },
}
