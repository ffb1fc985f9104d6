//! Survivor expected value
//!
//! EV = p / max(ε, public share) / survival rate
//!
//! The survival rate term is floored (0.1 by default) so late-season pools
//! with few survivors do not blow the score up.

use ordered_float::OrderedFloat;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::cache::{EvCache, EvKey};
use crate::config::SurvivorConfig;
use crate::domain::{EntrySnapshot, PoolSnapshot, SurvivorPick, TeamWeekOption};
use crate::error::RuleViolation;
use crate::scoring::probability::resolve_probability;

pub struct SurvivorEvEngine {
    config: SurvivorConfig,
    cache: Option<EvCache>,
}

impl SurvivorEvEngine {
    pub fn new(config: SurvivorConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Engine with a cache when the configured TTL is non-zero
    pub fn from_config(config: SurvivorConfig) -> Self {
        let cache = (config.cache_ttl_secs > 0).then(|| EvCache::from_config(&config));
        Self { config, cache }
    }

    /// Put a shared cache in front of EV computation
    pub fn with_cache(mut self, cache: EvCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &SurvivorConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&EvCache> {
        self.cache.as_ref()
    }

    /// Survival-adjusted EV for one team
    pub fn expected_value(
        &self,
        win_probability: f64,
        public_pick_share: f64,
        pool: &PoolSnapshot,
    ) -> f64 {
        let epsilon = self.config.public_pick_epsilon.max(f64::MIN_POSITIVE);
        let share = if public_pick_share.is_finite() {
            public_pick_share.max(epsilon)
        } else {
            epsilon
        };
        win_probability / share / pool.survival_rate(self.config.survival_rate_floor)
    }

    /// Score one option for one entry.
    ///
    /// Refuses eliminated entries and teams the entry already used.
    pub fn score_option(
        &self,
        entry: &EntrySnapshot,
        pool: &PoolSnapshot,
        option: &TeamWeekOption,
        week: u32,
    ) -> Result<SurvivorPick, RuleViolation> {
        entry.ensure_active()?;
        entry.ensure_unused(&option.team)?;
        Ok(self.evaluate(entry, pool, option, week))
    }

    fn evaluate(
        &self,
        entry: &EntrySnapshot,
        pool: &PoolSnapshot,
        option: &TeamWeekOption,
        week: u32,
    ) -> SurvivorPick {
        let win_probability = resolve_probability(option.win_probability);
        let public_pick_share = pool.public_pick_share(&option.team);

        let expected_value = match &self.cache {
            Some(cache) => {
                let key = EvKey::new(&option.team, week, pool);
                match cache.get(&key, win_probability, public_pick_share) {
                    Some(ev) => ev,
                    None => {
                        let ev = self.expected_value(win_probability, public_pick_share, pool);
                        cache.insert(key, win_probability, public_pick_share, ev);
                        ev
                    }
                }
            }
            None => self.expected_value(win_probability, public_pick_share, pool),
        };

        SurvivorPick {
            entry_id: entry.entry_id.clone(),
            team: option.team.clone(),
            week,
            win_probability,
            public_pick_share,
            survival_rate: pool.survival_rate(self.config.survival_rate_floor),
            expected_value,
            degraded: option.win_probability.is_missing(),
        }
    }

    /// Eligible options for the entry, best first.
    ///
    /// Used teams, idle teams and options for other weeks are left out.
    /// Sorted by EV, then win probability, then team id.
    pub fn rank(
        &self,
        entry: &EntrySnapshot,
        pool: &PoolSnapshot,
        options: &[TeamWeekOption],
        week: u32,
    ) -> Result<Vec<SurvivorPick>, RuleViolation> {
        if let Err(violation) = entry.ensure_active() {
            warn!(entry_id = %entry.entry_id, "refusing to rank for eliminated entry");
            return Err(violation);
        }

        let mut picks: Vec<SurvivorPick> = options
            .iter()
            .filter(|option| option.week == week && option.playing)
            .filter(|option| !entry.used_teams.contains(&option.team))
            .map(|option| self.evaluate(entry, pool, option, week))
            .collect();

        picks.sort_by(|a, b| {
            OrderedFloat(b.expected_value)
                .cmp(&OrderedFloat(a.expected_value))
                .then_with(|| OrderedFloat(b.win_probability).cmp(&OrderedFloat(a.win_probability)))
                .then_with(|| a.team.cmp(&b.team))
        });

        // A team listed twice keeps its best-scoring entry
        let mut seen = HashSet::new();
        picks.retain(|pick| seen.insert(pick.team.clone()));

        debug!(
            entry_id = %entry.entry_id,
            week,
            eligible = picks.len(),
            "ranked survivor options"
        );
        Ok(picks)
    }
}
