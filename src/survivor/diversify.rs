//! Diversification across a batch of survivor entries in one pool.
//!
//! One batch in, one assignment out. The batch is processed sequentially
//! in a fixed order so the result is reproducible; each strategy keeps
//! its own criteria and an entry that cannot meet them is reported as
//! unresolved instead of being moved to a different policy.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use super::ev::SurvivorEvEngine;
use crate::config::DiversificationConfig;
use crate::domain::{EntrySnapshot, PoolSnapshot, SurvivorPick, TeamId, TeamWeekOption};
use crate::error::RuleViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiversificationStrategy {
    /// No two entries share a team
    Block,
    /// Every entry takes a high-confidence team, repeats allowed
    Correlated,
    /// Entries alternate between a safe tier and a contrarian band
    Hedge,
}

impl DiversificationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiversificationStrategy::Block => "BLOCK",
            DiversificationStrategy::Correlated => "CORRELATED",
            DiversificationStrategy::Hedge => "HEDGE",
        }
    }
}

impl fmt::Display for DiversificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiversificationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "block" => Ok(DiversificationStrategy::Block),
            "correlated" => Ok(DiversificationStrategy::Correlated),
            "hedge" => Ok(DiversificationStrategy::Hedge),
            other => Err(format!(
                "unknown strategy '{other}' (expected block, correlated or hedge)"
            )),
        }
    }
}

/// Which pool of teams an assignment was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickTier {
    /// Best remaining EV (BLOCK)
    Unique,
    /// At or above the correlated floor
    HighConfidence,
    /// HEDGE safe tier
    Safe,
    /// HEDGE contrarian band
    Contrarian,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Nothing the entry may still use meets the strategy's criteria
    NoEligibleTeam,
    /// Entry is already out of the pool
    EntryEliminated { week: u32 },
}

impl From<&RuleViolation> for UnresolvedReason {
    fn from(violation: &RuleViolation) -> Self {
        match violation {
            RuleViolation::EntryEliminated { week, .. } => {
                UnresolvedReason::EntryEliminated { week: *week }
            }
            RuleViolation::TeamAlreadyUsed { .. } => UnresolvedReason::NoEligibleTeam,
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NoEligibleTeam => f.write_str("no eligible team"),
            UnresolvedReason::EntryEliminated { week } => {
                write!(f, "entry eliminated in week {week}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    Assigned { pick: SurvivorPick, tier: PickTier },
    Unresolved { reason: UnresolvedReason },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPlan {
    pub entry_id: String,
    #[serde(flatten)]
    pub assignment: Assignment,
}

impl EntryPlan {
    pub fn pick(&self) -> Option<&SurvivorPick> {
        match &self.assignment {
            Assignment::Assigned { pick, .. } => Some(pick),
            Assignment::Unresolved { .. } => None,
        }
    }

    pub fn team(&self) -> Option<&TeamId> {
        self.pick().map(|pick| &pick.team)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.assignment, Assignment::Assigned { .. })
    }
}

/// Assignment for a whole batch, in the order the entries were given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationPlan {
    pub strategy: DiversificationStrategy,
    pub week: u32,
    pub entries: Vec<EntryPlan>,
}

impl DiversificationPlan {
    pub fn entry(&self, entry_id: &str) -> Option<&EntryPlan> {
        self.entries.iter().find(|plan| plan.entry_id == entry_id)
    }

    pub fn assigned(&self) -> impl Iterator<Item = &EntryPlan> {
        self.entries.iter().filter(|plan| plan.is_resolved())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &EntryPlan> {
        self.entries.iter().filter(|plan| !plan.is_resolved())
    }

    /// Number of different teams used across the batch
    pub fn distinct_teams(&self) -> usize {
        self.entries
            .iter()
            .filter_map(EntryPlan::team)
            .collect::<HashSet<_>>()
            .len()
    }
}

pub struct Diversifier<'a> {
    engine: &'a SurvivorEvEngine,
    config: &'a DiversificationConfig,
}

impl<'a> Diversifier<'a> {
    pub fn new(engine: &'a SurvivorEvEngine, config: &'a DiversificationConfig) -> Self {
        Self { engine, config }
    }

    /// Assign one team per entry for `week` under `strategy`
    pub fn assign(
        &self,
        entries: &[EntrySnapshot],
        pool: &PoolSnapshot,
        options: &[TeamWeekOption],
        week: u32,
        strategy: DiversificationStrategy,
    ) -> DiversificationPlan {
        let mut slots: Vec<Option<Assignment>> = vec![None; entries.len()];
        let mut active: Vec<(usize, Vec<SurvivorPick>)> = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            match self.engine.rank(entry, pool, options, week) {
                Ok(ranked) => active.push((idx, ranked)),
                Err(violation) => {
                    info!(entry_id = %entry.entry_id, %violation, "entry skipped");
                    slots[idx] = Some(Assignment::Unresolved {
                        reason: UnresolvedReason::from(&violation),
                    });
                }
            }
        }

        match strategy {
            DiversificationStrategy::Block => self.block(&mut active, &mut slots, entries),
            DiversificationStrategy::Correlated => self.correlated(&active, &mut slots),
            DiversificationStrategy::Hedge => self.hedge(&active, &mut slots),
        }

        let plan = DiversificationPlan {
            strategy,
            week,
            entries: entries
                .iter()
                .zip(slots)
                .map(|(entry, slot)| EntryPlan {
                    entry_id: entry.entry_id.clone(),
                    assignment: slot.unwrap_or(Assignment::Unresolved {
                        reason: UnresolvedReason::NoEligibleTeam,
                    }),
                })
                .collect(),
        };

        for unresolved in plan.unresolved() {
            if let Assignment::Unresolved { reason } = &unresolved.assignment {
                info!(entry_id = %unresolved.entry_id, %reason, %strategy, "entry unresolved");
            }
        }
        debug!(
            %strategy,
            week,
            entries = plan.entries.len(),
            distinct_teams = plan.distinct_teams(),
            "diversification plan built"
        );
        plan
    }

    /// Entries with the highest EV ceiling choose first; each takes its best
    /// team not yet taken by another entry in the batch.
    fn block(
        &self,
        active: &mut [(usize, Vec<SurvivorPick>)],
        slots: &mut [Option<Assignment>],
        entries: &[EntrySnapshot],
    ) {
        active.sort_by(|(a_idx, a_ranked), (b_idx, b_ranked)| {
            let a_best = a_ranked.first().map(|p| p.expected_value).unwrap_or(f64::NEG_INFINITY);
            let b_best = b_ranked.first().map(|p| p.expected_value).unwrap_or(f64::NEG_INFINITY);
            OrderedFloat(b_best)
                .cmp(&OrderedFloat(a_best))
                .then_with(|| entries[*a_idx].entry_id.cmp(&entries[*b_idx].entry_id))
        });

        let mut taken: HashSet<TeamId> = HashSet::new();
        for (idx, ranked) in active.iter() {
            slots[*idx] = Some(match ranked.iter().find(|p| !taken.contains(&p.team)) {
                Some(pick) => {
                    taken.insert(pick.team.clone());
                    Assignment::Assigned {
                        pick: pick.clone(),
                        tier: PickTier::Unique,
                    }
                }
                None => Assignment::Unresolved {
                    reason: UnresolvedReason::NoEligibleTeam,
                },
            });
        }
    }

    /// Every entry takes its best team at or above the correlated floor
    fn correlated(&self, active: &[(usize, Vec<SurvivorPick>)], slots: &mut [Option<Assignment>]) {
        let floor = self.config.correlated_floor;
        for (idx, ranked) in active {
            slots[*idx] = Some(match ranked.iter().find(|p| p.win_probability >= floor) {
                Some(pick) => Assignment::Assigned {
                    pick: pick.clone(),
                    tier: PickTier::HighConfidence,
                },
                None => Assignment::Unresolved {
                    reason: UnresolvedReason::NoEligibleTeam,
                },
            });
        }
    }

    /// Active entries alternate safe / contrarian in input order. Within a
    /// tier an entry prefers a team the batch has not taken yet.
    fn hedge(&self, active: &[(usize, Vec<SurvivorPick>)], slots: &mut [Option<Assignment>]) {
        let mut taken: HashSet<TeamId> = HashSet::new();

        for (turn, (idx, ranked)) in active.iter().enumerate() {
            let tier = if turn % 2 == 0 {
                PickTier::Safe
            } else {
                PickTier::Contrarian
            };
            let in_tier: Vec<&SurvivorPick> = ranked
                .iter()
                .filter(|p| self.in_hedge_tier(tier, p.win_probability))
                .collect();

            let choice = in_tier
                .iter()
                .find(|p| !taken.contains(&p.team))
                .or_else(|| in_tier.first())
                .copied();

            slots[*idx] = Some(match choice {
                Some(pick) => {
                    taken.insert(pick.team.clone());
                    Assignment::Assigned {
                        pick: pick.clone(),
                        tier,
                    }
                }
                None => Assignment::Unresolved {
                    reason: UnresolvedReason::NoEligibleTeam,
                },
            });
        }
    }

    fn in_hedge_tier(&self, tier: PickTier, p: f64) -> bool {
        match tier {
            PickTier::Safe => p >= self.config.hedge_safe_floor,
            PickTier::Contrarian => p >= self.config.contrarian_min && p <= self.config.contrarian_max,
            PickTier::Unique | PickTier::HighConfidence => false,
        }
    }
}
