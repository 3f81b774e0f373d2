//! Pipeline configuration.
//!
//! All tunables — upstream bases, timeouts, merge policy, probe candidates —
//! travel in a [`SourceConfig`] threaded explicitly into each component.
//! There are no process-wide mutable singletons; tests point the bases at a
//! mock server and everything downstream follows.

use crate::aggregate::MergePolicy;
use crate::cli::types::Season;
use crate::error::Result;
use std::time::Duration;

/// Env var overriding the primary NFL weekly-stats snapshot base URL.
pub const NFL_RAW_BASE_ENV_VAR: &str = "PICKEM_NFL_STATS_RAW_BASE";
/// Env var overriding the NFL release-asset fallback base URL.
pub const NFL_RELEASE_BASE_ENV_VAR: &str = "PICKEM_NFL_STATS_RELEASE_BASE";
/// Env var overriding the alternate NFL release-asset base URL.
pub const NFL_RELEASE_BASE_ALT_ENV_VAR: &str = "PICKEM_NFL_STATS_RELEASE_BASE_ALT";
/// Env var overriding the NBA site API base URL.
pub const NBA_BASE_ENV_VAR: &str = "PICKEM_NBA_API_BASE";

const DEFAULT_NFL_RAW_BASE: &str =
    "https://raw.githubusercontent.com/nflverse/nflfastR-data/master/data/player_stats";
const DEFAULT_NFL_RELEASE_BASE: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/player_stats";
const DEFAULT_NFL_RELEASE_BASE_ALT: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/stats_player";
const DEFAULT_NBA_BASE: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba";

/// Configuration for the stat pipeline, passed explicitly into every
/// component that fetches or merges.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Primary base for season CSV snapshots (`player_stats_<SEASON>.csv.gz`).
    pub nfl_raw_base: String,
    /// Release-asset fallbacks, tried in order after the raw base
    /// (`stats_player_week_<SEASON>.csv[.gz]` under each).
    pub nfl_release_bases: Vec<String>,
    /// Base for the NBA scoreboard / summary / teams endpoints.
    pub nba_base: String,
    /// User agent sent on every upstream request.
    pub user_agent: String,
    /// Per-request timeout. A slow team fetch times out alone; siblings
    /// continue.
    pub request_timeout: Duration,
    /// How duplicate observations of one player within a period merge.
    pub merge_policy: MergePolicy,
    /// Seasons the backward probe walks, newest first.
    pub probe_seasons: Vec<Season>,
}

impl SourceConfig {
    /// Defaults with env-var overrides applied, mirroring how deployments
    /// repoint the snapshot mirrors without a rebuild.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(base) = std::env::var(NFL_RAW_BASE_ENV_VAR) {
            cfg.nfl_raw_base = base;
        }
        if let Ok(base) = std::env::var(NFL_RELEASE_BASE_ENV_VAR) {
            cfg.nfl_release_bases[0] = base;
        }
        if let Ok(base) = std::env::var(NFL_RELEASE_BASE_ALT_ENV_VAR) {
            cfg.nfl_release_bases[1] = base;
        }
        if let Ok(base) = std::env::var(NBA_BASE_ENV_VAR) {
            cfg.nba_base = base;
        }
        cfg
    }

    /// Build the HTTP client used for all fetches under this config.
    pub fn client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.request_timeout)
            .build()?;
        Ok(client)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            nfl_raw_base: DEFAULT_NFL_RAW_BASE.to_string(),
            nfl_release_bases: vec![
                DEFAULT_NFL_RELEASE_BASE.to_string(),
                DEFAULT_NFL_RELEASE_BASE_ALT.to_string(),
            ],
            nba_base: DEFAULT_NBA_BASE.to_string(),
            user_agent: "pickem-stats/0.3".to_string(),
            request_timeout: Duration::from_secs(15),
            merge_policy: MergePolicy::MaxPoints,
            probe_seasons: vec![Season::new(2025), Season::new(2024), Season::new(2023)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_three_candidate_bases() {
        let cfg = SourceConfig::default();
        assert!(cfg.nfl_raw_base.contains("player_stats"));
        assert_eq!(cfg.nfl_release_bases.len(), 2);
        assert_eq!(cfg.merge_policy, MergePolicy::MaxPoints);
        assert_eq!(cfg.probe_seasons.len(), 3);
    }

    #[test]
    fn client_builds_with_timeout() {
        let cfg = SourceConfig::default();
        assert!(cfg.client().is_ok());
    }
}
