//! Fantasy Pick'em Stats Pipeline
//!
//! A Rust library (and CLI) that turns heterogeneous upstream sports-data
//! feeds into uniform per-player fantasy scoring records for a pick'em app:
//! pick one player per roster slot, race the point target.
//!
//! ## Features
//!
//! - **Source Adapters**: weekly-stats CSV snapshots (football, with mirror
//!   fallback and gzip sniffing) and scoreboard/box-score JSON (basketball,
//!   with schema-drift tolerance)
//! - **Field Resolution**: every provider field access goes through ordered
//!   synonym lists, first-match-wins
//! - **Scoring**: deterministic fantasy-point formulas (std/half/PPR for
//!   football; a fixed formula for basketball)
//! - **Aggregation**: one record per player identity with a configurable
//!   duplicate-merge policy
//! - **Period Resolution**: season/week math from the UTC calendar plus
//!   backward probing for the latest populated period
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pickem_stats::{api, Period, ScoringMode, Season, SourceConfig, Week};
//!
//! # async fn example() -> pickem_stats::Result<()> {
//! let config = SourceConfig::from_env();
//! let period = Period::week(Season::new(2024), Week::new(1));
//! let snapshot = api::get_scoring_snapshot(&config, &period, ScoringMode::Ppr).await?;
//! for (player, points) in snapshot.ranked().iter().take(5) {
//!     println!("{} {:.2}", player.name, points);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! The upstream mirrors can be repointed without a rebuild:
//! ```bash
//! export PICKEM_NFL_STATS_RAW_BASE=https://mirror.example/player_stats
//! export PICKEM_NBA_API_BASE=https://proxy.example/nba
//! ```

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod period;
pub mod scoring;
pub mod sources;

// Re-export commonly used types
pub use aggregate::{MergePolicy, PlayerIdentity, ScoringRecord};
pub use cli::types::{Period, Position, ScoringMode, Season, Sport, Week};
pub use config::SourceConfig;
pub use error::{PickemError, Result};
