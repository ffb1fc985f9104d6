//! Elo rating model
//!
//! Ratings are read-only during scoring. `EloModel::rate_result` computes
//! the post-game change, and `RatingSnapshot::apply` is the only way to
//! write it back, so a scoring pass is reproducible from the snapshot it
//! was given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::probability::{clamp_probability, PICK_EM_PROBABILITY};
use crate::config::WeightConfig;
use crate::domain::{Input, TeamId};

/// Starting rating for a team with no history
pub const DEFAULT_RATING: f64 = 1500.0;

/// Result of a completed game from the home perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    HomeWin,
    AwayWin,
    Tie,
}

impl GameOutcome {
    pub fn from_score(home_points: u32, away_points: u32) -> Self {
        if home_points > away_points {
            GameOutcome::HomeWin
        } else if away_points > home_points {
            GameOutcome::AwayWin
        } else {
            GameOutcome::Tie
        }
    }

    /// Actual score for the home team: 1 / 0 / 0.5
    pub fn home_actual(&self) -> f64 {
        match self {
            GameOutcome::HomeWin => 1.0,
            GameOutcome::AwayWin => 0.0,
            GameOutcome::Tie => 0.5,
        }
    }
}

/// Rating change produced by one completed game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    /// Pre-game home win expectation
    pub expected_home: f64,
    pub home_delta: f64,
    pub away_delta: f64,
    pub new_home: f64,
    pub new_away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EloModel {
    pub k_factor: f64,
    /// Rating points added to the home side
    pub home_bonus: f64,
}

impl EloModel {
    pub fn new(k_factor: f64, home_bonus: f64) -> Self {
        Self {
            k_factor,
            home_bonus,
        }
    }

    pub fn from_weights(weights: &WeightConfig) -> Self {
        Self::new(weights.elo_k_factor, weights.elo_home_bonus)
    }

    /// Home win expectation before clamping: 1 / (1 + 10^((Ra - Rh - bonus) / 400))
    fn expected_home(&self, home_rating: f64, away_rating: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf((away_rating - home_rating - self.home_bonus) / 400.0))
    }

    /// Home win probability for two known ratings
    pub fn home_win_probability(&self, home_rating: f64, away_rating: f64) -> f64 {
        clamp_probability(self.expected_home(home_rating, away_rating))
    }

    /// Home win probability; either rating missing yields pick'em
    pub fn win_probability(&self, home: Input<f64>, away: Input<f64>) -> f64 {
        match (home, away) {
            (Input::Known(h), Input::Known(a)) if h.is_finite() && a.is_finite() => {
                self.home_win_probability(h, a)
            }
            _ => PICK_EM_PROBABILITY,
        }
    }

    /// Post-game change: each side moves by K * (actual - expected)
    pub fn rate_result(
        &self,
        home_rating: f64,
        away_rating: f64,
        outcome: GameOutcome,
    ) -> RatingUpdate {
        self.rate_scaled(home_rating, away_rating, outcome, 1.0)
    }

    /// Like `rate_result`, with the K-factor scaled by a margin-of-victory multiplier.
    ///
    /// Blowouts move ratings more; a favorite winning big moves them less
    /// than an underdog doing the same.
    pub fn rate_result_with_margin(
        &self,
        home_rating: f64,
        away_rating: f64,
        home_points: u32,
        away_points: u32,
    ) -> RatingUpdate {
        let outcome = GameOutcome::from_score(home_points, away_points);
        let margin = home_points.abs_diff(away_points) as f64;

        let multiplier = match outcome {
            GameOutcome::Tie => 1.0,
            GameOutcome::HomeWin | GameOutcome::AwayWin => {
                let home_adjusted = home_rating + self.home_bonus;
                let winner_edge = match outcome {
                    GameOutcome::HomeWin => home_adjusted - away_rating,
                    _ => away_rating - home_adjusted,
                };
                let base = (margin + 1.0).ln();
                base * (2.2 / (winner_edge.max(0.0) * 0.001 + 2.2))
            }
        };

        self.rate_scaled(home_rating, away_rating, outcome, multiplier.max(0.0))
    }

    fn rate_scaled(
        &self,
        home_rating: f64,
        away_rating: f64,
        outcome: GameOutcome,
        multiplier: f64,
    ) -> RatingUpdate {
        let expected_home = self.expected_home(home_rating, away_rating);
        let home_delta = self.k_factor * multiplier * (outcome.home_actual() - expected_home);

        RatingUpdate {
            expected_home,
            home_delta,
            away_delta: -home_delta,
            new_home: home_rating + home_delta,
            new_away: away_rating - home_delta,
        }
    }
}

/// One dated rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedRating {
    pub as_of: NaiveDate,
    pub rating: f64,
}

/// Ratings per team over time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingSnapshot {
    /// Per-team history, kept sorted by date
    ratings: HashMap<TeamId, Vec<DatedRating>>,
}

impl RatingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating; a second value for the same date replaces the first
    pub fn insert(&mut self, team: TeamId, as_of: NaiveDate, rating: f64) {
        let history = self.ratings.entry(team).or_default();
        match history.binary_search_by(|r| r.as_of.cmp(&as_of)) {
            Ok(idx) => history[idx].rating = rating,
            Err(idx) => history.insert(idx, DatedRating { as_of, rating }),
        }
    }

    /// Latest rating dated on or before `date`
    pub fn rating_as_of(&self, team: &TeamId, date: NaiveDate) -> Input<f64> {
        self.ratings
            .get(team)
            .and_then(|history| history.iter().rev().find(|r| r.as_of <= date))
            .map(|r| r.rating)
            .into()
    }

    /// Write a completed game's update back, dated after the game
    pub fn apply(&mut self, home: &TeamId, away: &TeamId, update: &RatingUpdate, as_of: NaiveDate) {
        self.insert(home.clone(), as_of, update.new_home);
        self.insert(away.clone(), as_of, update.new_away);
    }

    pub fn team_count(&self) -> usize {
        self.ratings.len()
    }
}
