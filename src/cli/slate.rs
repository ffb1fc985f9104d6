//! JSON slate files consumed by the CLI.
//!
//! ```json
//! {
//!   "week": 7,
//!   "games": [ { "game_id": "...", "home": "KC", "away": "LV", ... } ],
//!   "pool": { "pool_id": "office", "total_entries": 120, "surviving_entries": 64 },
//!   "entries": [ { "entry_id": "e1", "used_teams": ["BUF"] } ],
//!   "options": []
//! }
//! ```
//!
//! `options` is optional: when empty, survivor options are built from both
//! sides of every scored game.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::domain::{CandidatePick, EntrySnapshot, GameInputs, PoolSnapshot, TeamWeekOption};
use crate::error::{PickemError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlateFile {
    pub week: u32,
    #[serde(default)]
    pub games: Vec<GameInputs>,
    /// Explicit survivor options (byes, postponements, external probabilities)
    #[serde(default)]
    pub options: Vec<TeamWeekOption>,
    #[serde(default)]
    pub pool: Option<PoolSnapshot>,
    #[serde(default)]
    pub entries: Vec<EntrySnapshot>,
}

impl SlateFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let slate = Self::from_json(&raw)?;
        debug!(
            path = %path.as_ref().display(),
            games = slate.games.len(),
            entries = slate.entries.len(),
            "slate loaded"
        );
        Ok(slate)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let slate: SlateFile = serde_json::from_str(raw)?;
        if let Some(game) = slate.games.iter().find(|g| g.week != slate.week) {
            return Err(PickemError::Validation(format!(
                "game {} is in week {}, slate is week {}",
                game.game_id, game.week, slate.week
            )));
        }
        Ok(slate)
    }

    pub fn pool(&self) -> Result<&PoolSnapshot> {
        self.pool
            .as_ref()
            .ok_or_else(|| PickemError::Validation("slate has no pool snapshot".to_string()))
    }

    pub fn entry(&self, entry_id: &str) -> Result<&EntrySnapshot> {
        self.entries
            .iter()
            .find(|e| e.entry_id == entry_id)
            .ok_or_else(|| PickemError::Validation(format!("entry {entry_id} not in slate")))
    }

    /// Survivor options for the week: explicit ones if given, else both
    /// sides of every scored game
    pub fn survivor_options(&self, picks: &[CandidatePick]) -> Vec<TeamWeekOption> {
        if self.options.is_empty() {
            TeamWeekOption::from_candidates(picks, self.week)
        } else {
            self.options.clone()
        }
    }
}
