//! Caller-side TTL cache.
//!
//! The core pipeline never caches — freshness is the caller's call. The CLI
//! layers this cache on top for the two lookups where a TTL pays off: the
//! current-period result (stable for an hour) and fetched snapshots
//! (immutable once a period is finalized). Memory LRU in front, JSON files
//! under the user cache directory behind; file age is the freshness clock.

use crate::cli::types::{ScoringMode, Sport};
use crate::error::{PickemError, Result};
use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Default TTL for the current-period result.
pub const PERIOD_TTL: Duration = Duration::from_secs(3600);

/// Default TTL for fetched snapshot payloads.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(15 * 60);

/// A cacheable lookup key with a stable file-name form.
pub trait CacheKey: Hash + Eq + Clone {
    fn to_file_key(&self) -> String;
}

/// Key for the cached current-period computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodCacheKey {
    pub sport: Sport,
}

impl CacheKey for PeriodCacheKey {
    fn to_file_key(&self) -> String {
        format!("current-period_{}", self.sport)
    }
}

/// Key for a cached scoring snapshot or player pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotCacheKey {
    pub sport: Sport,
    /// Period rendered as a path-safe tag, e.g. `2024-w1` or `2025-01-15`.
    pub period_tag: String,
    /// `None` for player pools (mode-independent).
    pub mode: Option<ScoringMode>,
}

impl SnapshotCacheKey {
    pub fn new(sport: Sport, period: &crate::cli::types::Period, mode: Option<ScoringMode>) -> Self {
        Self {
            sport,
            period_tag: period.to_string().replace(' ', "-"),
            mode,
        }
    }
}

impl CacheKey for SnapshotCacheKey {
    fn to_file_key(&self) -> String {
        let mode = self
            .mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| "pool".to_string());
        format!("snapshot_{}_{}_{}", self.sport, self.period_tag, mode)
    }
}

/// Default on-disk location: `<user cache dir>/pickem-stats/`.
pub fn default_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("pickem-stats")
}

/// LRU memory tier over TTL'd JSON files.
pub struct TtlCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + DeserializeOwned,
{
    memory: Mutex<LruCache<K, (SystemTime, V)>>,
    dir: PathBuf,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + DeserializeOwned,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_dir(capacity, ttl, default_cache_dir())
    }

    /// Cache rooted at an explicit directory (tests point this at a tempdir).
    pub fn with_dir(capacity: usize, ttl: Duration, dir: impl Into<PathBuf>) -> Self {
        Self {
            memory: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("nonzero capacity"),
            )),
            dir: dir.into(),
            ttl,
        }
    }

    fn path_for(&self, key: &K) -> PathBuf {
        self.dir.join(format!("{}.json", key.to_file_key()))
    }

    fn is_fresh(&self, stored_at: SystemTime) -> bool {
        stored_at
            .elapsed()
            .map(|age| age <= self.ttl)
            .unwrap_or(false)
    }

    /// Fresh value for the key, checking memory first, then disk (promoting
    /// a disk hit into memory). Stale entries read as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        if let Some((stored_at, value)) = self.memory.lock().unwrap().get(key) {
            if self.is_fresh(*stored_at) {
                return Some(value.clone());
            }
        }

        let (stored_at, value) = self.get_from_disk(key)?;
        if !self.is_fresh(stored_at) {
            return None;
        }
        self.memory
            .lock()
            .unwrap()
            .put(key.clone(), (stored_at, value.clone()));
        Some(value)
    }

    /// Store in both tiers. The memory tier is populated even when the disk
    /// write then fails, so callers may ignore the error to degrade to
    /// memory-only caching.
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.memory
            .lock()
            .unwrap()
            .put(key.clone(), (SystemTime::now(), value.clone()));
        self.put_to_disk(&key, &value)
    }

    /// Drop a key from both tiers (used by `--refresh`).
    pub fn invalidate(&self, key: &K) -> Result<()> {
        self.memory.lock().unwrap().pop(key);
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn get_from_disk(&self, key: &K) -> Option<(SystemTime, V)> {
        let path = self.path_for(key);
        let stored_at = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let content = read_to_string(&path)?;
        let value = serde_json::from_str(&content).ok()?;
        Some((stored_at, value))
    }

    fn put_to_disk(&self, key: &K, value: &V) -> Result<()> {
        let path = self.path_for(key);
        let content = serde_json::to_string_pretty(value)?;
        write_string(&path, &content).map_err(|err| PickemError::Cache {
            message: format!("writing {}: {err}", path.display()),
        })
    }
}

fn read_to_string(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}
