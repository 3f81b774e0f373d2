//! Current-period resolution and backward probing commands.

use crate::api;
use crate::cache::{PeriodCacheKey, TtlCache, PERIOD_TTL};
use crate::cli::types::{Period, Sport};
use crate::config::SourceConfig;
use crate::error::Result;
use chrono::Utc;

/// Print the current period for a sport. The result changes at most weekly
/// (football) or daily (basketball), so it is cached with an hourly TTL.
pub async fn handle_current_period(sport: Sport, as_json: bool, refresh: bool) -> Result<()> {
    let cache: TtlCache<PeriodCacheKey, Period> = TtlCache::new(2, PERIOD_TTL);
    let key = PeriodCacheKey { sport };
    if refresh {
        let _ = cache.invalidate(&key);
    }

    let period = match cache.get(&key) {
        Some(period) => period,
        None => {
            let period = api::get_current_period(sport, Utc::now());
            let _ = cache.put(key, period);
            period
        }
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&period)?);
    } else {
        println!("{period}");
    }
    Ok(())
}

/// Probe backward for the latest football period with populated data.
pub async fn handle_find_period(as_json: bool) -> Result<()> {
    let config = SourceConfig::from_env();
    println!("Probing for the latest populated period...");
    let period = crate::period::find_latest_period(&config).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&period)?);
    } else {
        println!("{period}");
    }
    Ok(())
}
