use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::game::{Side, TeamId};

/// Situational factor an adjustment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    HomeField,
    Rest,
    Weather,
    Injury,
    RecentForm,
    Motivation,
    Divisional,
    Revenge,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::HomeField => "home_field",
            Factor::Rest => "rest",
            Factor::Weather => "weather",
            Factor::Injury => "injury",
            Factor::RecentForm => "recent_form",
            Factor::Motivation => "motivation",
            Factor::Divisional => "divisional",
            Factor::Revenge => "revenge",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed point-spread adjustment from the home perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub factor: Factor,
    /// Positive favors home, negative favors away
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Adjustment {
    pub fn new(factor: Factor, points: f64) -> Self {
        Self {
            factor,
            points,
            detail: None,
        }
    }

    pub fn none(factor: Factor) -> Self {
        Self::new(factor, 0.0)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_neutral(&self) -> bool {
        self.points == 0.0
    }
}

/// Input that was absent and replaced by its neutral default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedInput {
    MarketOdds,
    HomeRating,
    AwayRating,
    Spread,
    RestDays,
    Weather,
    Standings,
    Injuries,
}

/// Provisional strength buckets for a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLabel {
    Weak,
    Moderate,
    Strong,
}

impl ConfidenceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::Weak => "WEAK",
            ConfidenceLabel::Moderate => "MODERATE",
            ConfidenceLabel::Strong => "STRONG",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePick {
    pub game_id: String,
    pub home: TeamId,
    pub away: TeamId,
    /// No-vig market probability of a home win
    pub market_probability: f64,
    /// Elo probability of a home win
    pub elo_probability: f64,
    pub adjustments: Vec<Adjustment>,
    /// Expected home margin in points after all adjustments
    pub projected_margin: f64,
    /// Home line the pick was scored against (negative = home favored)
    #[serde(default)]
    pub spread: Option<f64>,
    /// 0-100, centered at 50; above 50 favors home
    pub home_confidence: f64,
    /// Confidence in the recommended side (50-100)
    pub confidence: f64,
    pub recommended_side: Side,
    pub label: ConfidenceLabel,
    #[serde(default)]
    pub news_applied: bool,
    #[serde(default)]
    pub degraded: Vec<DegradedInput>,
}

impl CandidatePick {
    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn recommended_team(&self) -> &TeamId {
        self.team(self.recommended_side)
    }

    /// Straight-up win probability for a side (0-1)
    pub fn win_probability(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_confidence / 100.0,
            Side::Away => 1.0 - self.home_confidence / 100.0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Sum of all situational points
    pub fn adjustment_total(&self) -> f64 {
        self.adjustments.iter().map(|a| a.points).sum()
    }
}

/// Output of one scoring pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Weight profile the caller selected
    pub profile: String,
    pub picks: Vec<CandidatePick>,
}

impl ScoringRun {
    pub fn new(profile: impl Into<String>, picks: Vec<CandidatePick>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile: profile.into(),
            picks,
        }
    }

    pub fn degraded_count(&self) -> usize {
        self.picks.iter().filter(|p| p.is_degraded()).count()
    }
}
