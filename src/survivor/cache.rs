//! Short-lived cache in front of the EV engine.
//!
//! Entries are keyed by team, week and pool size. The win probability and
//! public share used for the cached value are stored alongside it, and a
//! lookup with different inputs is a miss, so a cached EV never outlives
//! the inputs it was computed from.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::SurvivorConfig;
use crate::domain::{PoolSnapshot, TeamId};

/// Default freshness window: well inside a single scoring week
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Default maximum number of cached values
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvKey {
    pub team: TeamId,
    pub week: u32,
    pub total_entries: u32,
    pub surviving_entries: u32,
}

impl EvKey {
    pub fn new(team: &TeamId, week: u32, pool: &PoolSnapshot) -> Self {
        Self {
            team: team.clone(),
            week,
            total_entries: pool.total_entries,
            surviving_entries: pool.surviving_entries,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedEv {
    win_probability: f64,
    public_pick_share: f64,
    expected_value: f64,
    stored_at: DateTime<Utc>,
}

/// Thread-safe EV cache with TTL and a size bound
#[derive(Debug, Clone)]
pub struct EvCache {
    values: Arc<DashMap<EvKey, CachedEv>>,
    ttl: Duration,
    max_size: usize,
}

impl Default for EvCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS, DEFAULT_MAX_ENTRIES)
    }
}

impl EvCache {
    pub fn new(ttl_secs: i64, max_size: usize) -> Self {
        Self {
            values: Arc::new(DashMap::new()),
            ttl: Duration::seconds(ttl_secs.clamp(0, i64::MAX / 1000)),
            max_size: max_size.max(1),
        }
    }

    pub fn from_config(config: &SurvivorConfig) -> Self {
        let ttl = i64::try_from(config.cache_ttl_secs).unwrap_or(i64::MAX);
        Self::new(ttl, config.cache_max_entries)
    }

    fn is_stale(&self, value: &CachedEv, now: DateTime<Utc>) -> bool {
        now - value.stored_at > self.ttl
    }

    /// Cached EV for the key, if fresh and computed from the same inputs
    pub fn get(&self, key: &EvKey, win_probability: f64, public_pick_share: f64) -> Option<f64> {
        self.get_at(key, win_probability, public_pick_share, Utc::now())
    }

    fn get_at(
        &self,
        key: &EvKey,
        win_probability: f64,
        public_pick_share: f64,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let cached = self.values.get(key)?;
        let value = *cached.value();
        drop(cached);

        if self.is_stale(&value, now) {
            self.values.remove(key);
            return None;
        }
        if value.win_probability != win_probability || value.public_pick_share != public_pick_share
        {
            return None;
        }

        debug!(team = %key.team, week = key.week, "ev cache hit");
        Some(value.expected_value)
    }

    pub fn insert(
        &self,
        key: EvKey,
        win_probability: f64,
        public_pick_share: f64,
        expected_value: f64,
    ) {
        self.insert_at(key, win_probability, public_pick_share, expected_value, Utc::now());
    }

    fn insert_at(
        &self,
        key: EvKey,
        win_probability: f64,
        public_pick_share: f64,
        expected_value: f64,
        now: DateTime<Utc>,
    ) {
        if self.values.len() >= self.max_size && !self.values.contains_key(&key) {
            self.cleanup_stale_at(now);
            if self.values.len() >= self.max_size {
                // Still full of fresh values: drop the oldest one
                let oldest = self
                    .values
                    .iter()
                    .min_by_key(|entry| entry.value().stored_at)
                    .map(|entry| entry.key().clone());
                if let Some(oldest) = oldest {
                    self.values.remove(&oldest);
                }
            }
        }

        self.values.insert(
            key,
            CachedEv {
                win_probability,
                public_pick_share,
                expected_value,
                stored_at: now,
            },
        );
    }

    /// Remove every stale value
    pub fn cleanup_stale(&self) {
        self.cleanup_stale_at(Utc::now());
    }

    fn cleanup_stale_at(&self, now: DateTime<Utc>) {
        let before = self.values.len();
        self.values.retain(|_, value| now - value.stored_at <= self.ttl);
        let removed = before.saturating_sub(self.values.len());
        if removed > 0 {
            debug!(removed, "ev cache cleanup");
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&self) {
        self.values.clear();
    }
}
