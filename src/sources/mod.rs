//! Source adapters: fetch one upstream provider's raw payload and yield
//! provider-native rows for the field resolver.
//!
//! Adapters never cache; the caller controls freshness. Partial sub-fetch
//! failures (one team, one game) degrade to warnings, never abort siblings.

pub mod http;
pub mod nba;
pub mod nfl;
