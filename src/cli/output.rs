//! Output formatting for `pickem` commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::domain::{CandidatePick, SurvivorPick};
use crate::strategy::{PointsPlusCandidate, RankedPick};
use crate::survivor::{Assignment, EntryPlan};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Print a vec of Tabled + Serialize items in the chosen mode.
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                let table = Table::new(items).to_string();
                println!("{table}");
            }
        }
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(items)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Print a single Serialize item as pretty JSON.
pub fn print_json<T: Serialize>(item: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

/// Print a simple key-value pair.
pub fn print_kv(key: &str, value: &str) {
    println!("{key}: {value}");
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

/// Print a warning message.
pub fn print_warn(msg: &str) {
    println!("\x1b[33m{msg}\x1b[0m");
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m{msg}\x1b[0m");
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "" };
    text.to_string()
}

#[derive(Debug, Serialize, Tabled)]
pub struct ScoreRow {
    pub rank: usize,
    pub game: String,
    pub pick: String,
    pub opponent: String,
    pub confidence: String,
    pub line: String,
    pub label: String,
    pub degraded: String,
}

impl ScoreRow {
    pub fn new(row: &RankedPick, pick: Option<&CandidatePick>) -> Self {
        Self {
            rank: row.rank,
            game: row.game_id.clone(),
            pick: format!("{} ({})", row.team, row.side),
            opponent: row.opponent.to_string(),
            confidence: format!("{:.1}", row.confidence),
            line: row.line.map(|l| format!("{l:+.1}")).unwrap_or_default(),
            label: pick.map(|p| p.label.to_string()).unwrap_or_default(),
            degraded: yes_no(row.degraded),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct SurvivorRow {
    pub team: String,
    pub win_prob: String,
    pub public: String,
    pub ev: String,
    pub degraded: String,
}

impl From<&SurvivorPick> for SurvivorRow {
    fn from(pick: &SurvivorPick) -> Self {
        Self {
            team: pick.team.to_string(),
            win_prob: format!("{:.1}%", pick.win_probability * 100.0),
            public: format!("{:.1}%", pick.public_pick_share * 100.0),
            ev: format!("{:.2}", pick.expected_value),
            degraded: yes_no(pick.degraded),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct PlanRow {
    pub entry: String,
    pub team: String,
    pub tier: String,
    pub win_prob: String,
    pub ev: String,
    pub status: String,
}

impl From<&EntryPlan> for PlanRow {
    fn from(plan: &EntryPlan) -> Self {
        match &plan.assignment {
            Assignment::Assigned { pick, tier } => Self {
                entry: plan.entry_id.clone(),
                team: pick.team.to_string(),
                tier: format!("{tier:?}").to_lowercase(),
                win_prob: format!("{:.1}%", pick.win_probability * 100.0),
                ev: format!("{:.2}", pick.expected_value),
                status: "assigned".to_string(),
            },
            Assignment::Unresolved { reason } => Self {
                entry: plan.entry_id.clone(),
                team: String::new(),
                tier: String::new(),
                win_prob: String::new(),
                ev: String::new(),
                status: format!("unresolved: {reason}"),
            },
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct PointsPlusRow {
    pub game: String,
    pub team: String,
    pub role: String,
    pub line: String,
    pub expected_points: String,
    pub cover_prob: String,
}

impl From<&PointsPlusCandidate> for PointsPlusRow {
    fn from(c: &PointsPlusCandidate) -> Self {
        Self {
            game: c.game_id.clone(),
            team: c.team.to_string(),
            role: c.role.to_string(),
            line: format!("{:+.1}", c.line),
            expected_points: format!("{:+.2}", c.expected_points),
            cover_prob: format!("{:.1}%", c.cover_probability * 100.0),
        }
    }
}
