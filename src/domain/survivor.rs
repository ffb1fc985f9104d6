use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::game::{Side, TeamId};
use super::input::Input;
use super::pick::CandidatePick;
use crate::error::RuleViolation;

/// Teams an entry has already picked.
///
/// Insert-only: the set only grows over a season.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedTeams(BTreeSet<TeamId>);

impl UsedTeams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick; returns false if the team was already used
    pub fn insert(&mut self, team: TeamId) -> bool {
        self.0.insert(team)
    }

    pub fn contains(&self, team: &TeamId) -> bool {
        self.0.contains(team)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamId> {
        self.0.iter()
    }
}

impl FromIterator<TeamId> for UsedTeams {
    fn from_iter<I: IntoIterator<Item = TeamId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Active,
    Eliminated { week: u32 },
}

/// Read-only view of one survivor entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub entry_id: String,
    #[serde(default)]
    pub used_teams: UsedTeams,
    #[serde(default)]
    pub strikes: u32,
    #[serde(default)]
    pub status: EntryStatus,
}

impl EntrySnapshot {
    pub fn active(entry_id: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            used_teams: UsedTeams::new(),
            strikes: 0,
            status: EntryStatus::Active,
        }
    }

    pub fn with_used<I, T>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeamId>,
    {
        for team in teams {
            self.used_teams.insert(team.into());
        }
        self
    }

    pub fn eliminated_in(mut self, week: u32) -> Self {
        self.status = EntryStatus::Eliminated { week };
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, EntryStatus::Active)
    }

    /// Fail with the violated invariant if the entry is out
    pub fn ensure_active(&self) -> Result<(), RuleViolation> {
        match self.status {
            EntryStatus::Active => Ok(()),
            EntryStatus::Eliminated { week } => Err(RuleViolation::EntryEliminated {
                entry_id: self.entry_id.clone(),
                week,
            }),
        }
    }

    /// Fail if the team was already picked by this entry
    pub fn ensure_unused(&self, team: &TeamId) -> Result<(), RuleViolation> {
        if self.used_teams.contains(team) {
            return Err(RuleViolation::TeamAlreadyUsed {
                entry_id: self.entry_id.clone(),
                team: team.to_string(),
            });
        }
        Ok(())
    }
}

/// Point-in-time pool statistics for the target week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool_id: String,
    pub total_entries: u32,
    pub surviving_entries: u32,
    /// Share of surviving entries on each team this week (0-1)
    #[serde(default)]
    pub public_picks: HashMap<TeamId, f64>,
}

impl PoolSnapshot {
    pub fn new(pool_id: impl Into<String>, total_entries: u32, surviving_entries: u32) -> Self {
        Self {
            pool_id: pool_id.into(),
            total_entries,
            surviving_entries,
            public_picks: HashMap::new(),
        }
    }

    pub fn with_public_pick(mut self, team: impl Into<TeamId>, share: f64) -> Self {
        self.public_picks.insert(team.into(), share);
        self
    }

    /// Public share for a team; teams nobody picked have a share of zero
    pub fn public_pick_share(&self, team: &TeamId) -> f64 {
        self.public_picks
            .get(team)
            .copied()
            .filter(|share| share.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Surviving fraction of the pool, never below `floor`.
    ///
    /// An empty pool has nobody eliminated and counts as fully surviving.
    pub fn survival_rate(&self, floor: f64) -> f64 {
        let raw = if self.total_entries == 0 {
            1.0
        } else {
            (self.surviving_entries as f64 / self.total_entries as f64).min(1.0)
        };
        raw.max(floor)
    }
}

/// A team available to survivor entries in one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeekOption {
    pub team: TeamId,
    #[serde(default)]
    pub opponent: Option<TeamId>,
    pub week: u32,
    /// False for bye weeks or postponed games
    #[serde(default = "default_playing")]
    pub playing: bool,
    #[serde(default)]
    pub win_probability: Input<f64>,
}

fn default_playing() -> bool {
    true
}

impl TeamWeekOption {
    pub fn new(team: impl Into<TeamId>, week: u32, win_probability: f64) -> Self {
        Self {
            team: team.into(),
            opponent: None,
            week,
            playing: true,
            win_probability: Input::Known(win_probability),
        }
    }

    /// Option for one side of a scored game
    pub fn from_candidate(pick: &CandidatePick, side: Side, week: u32) -> Self {
        Self {
            team: pick.team(side).clone(),
            opponent: Some(pick.team(side.opposite()).clone()),
            week,
            playing: true,
            win_probability: Input::Known(pick.win_probability(side)),
        }
    }

    /// Both sides of every scored game
    pub fn from_candidates(picks: &[CandidatePick], week: u32) -> Vec<Self> {
        picks
            .iter()
            .flat_map(|pick| {
                [
                    Self::from_candidate(pick, Side::Home, week),
                    Self::from_candidate(pick, Side::Away, week),
                ]
            })
            .collect()
    }
}

/// A scored survivor option for one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivorPick {
    pub entry_id: String,
    pub team: TeamId,
    pub week: u32,
    pub win_probability: f64,
    pub public_pick_share: f64,
    pub survival_rate: f64,
    pub expected_value: f64,
    /// Win probability was missing and defaulted
    #[serde(default)]
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_teams_only_grow() {
        let mut used = UsedTeams::new();
        assert!(used.insert(TeamId::from("KC")));
        assert!(!used.insert(TeamId::from("KC")));
        assert_eq!(used.len(), 1);
        assert!(used.contains(&TeamId::from("KC")));
    }

    #[test]
    fn test_ensure_active_names_the_week() {
        let entry = EntrySnapshot::active("e1").eliminated_in(6);
        let err = entry.ensure_active().unwrap_err();
        assert_eq!(
            err,
            RuleViolation::EntryEliminated {
                entry_id: "e1".to_string(),
                week: 6
            }
        );
    }

    #[test]
    fn test_ensure_unused() {
        let entry = EntrySnapshot::active("e1").with_used(["BUF"]);
        assert!(entry.ensure_unused(&TeamId::from("BUF")).is_err());
        assert!(entry.ensure_unused(&TeamId::from("DET")).is_ok());
    }

    #[test]
    fn test_survival_rate_floor() {
        let pool = PoolSnapshot::new("p", 1000, 20);
        assert!((pool.survival_rate(0.1) - 0.1).abs() < 1e-12);

        let healthy = PoolSnapshot::new("p", 1000, 800);
        assert!((healthy.survival_rate(0.1) - 0.8).abs() < 1e-12);

        let empty = PoolSnapshot::new("p", 0, 0);
        assert_eq!(empty.survival_rate(0.1), 1.0);
    }

    #[test]
    fn test_public_share_defaults_to_zero() {
        let pool = PoolSnapshot::new("p", 10, 10).with_public_pick("DET", 0.4);
        assert_eq!(pool.public_pick_share(&TeamId::from("DET")), 0.4);
        assert_eq!(pool.public_pick_share(&TeamId::from("NYJ")), 0.0);
    }

    #[test]
    fn test_entry_status_serde() {
        let entry = EntrySnapshot::active("e1").eliminated_in(3);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"]["state"], "eliminated");
        assert_eq!(json["status"]["week"], 3);
    }
}
