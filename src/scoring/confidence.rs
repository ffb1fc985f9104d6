//! Weighted confidence calculator
//!
//! Turns market odds, Elo ratings and situational adjustments into one
//! 0-100 confidence per game:
//!
//! 1. Blend market and Elo probabilities by their weights. Whatever weight
//!    is left over stays at pick'em, leaving room for situational factors.
//! 2. Convert the blend to a point-spread baseline.
//! 3. Add every situational adjustment (points, home perspective).
//! 4. Convert back to a probability and scale to 0-100 around 50.
//! 5. Apply bounded news, then choose a side. An exact 50.0 goes to the
//!    configured tiebreak side (home by default).
//!
//! Missing inputs never abort scoring; they fall back to pick'em and are
//! listed in `CandidatePick::degraded`.

use tracing::{debug, info};

use super::elo::EloModel;
use super::factors::{apply_news, situational_adjustments};
use super::probability::{
    clamp_confidence, clamp_probability, no_vig_home_probability, probability_to_spread,
    resolve_probability, spread_to_probability, PICK_EM_PROBABILITY,
};
use crate::config::{ConfidenceConfig, WeightConfig};
use crate::domain::{
    Adjustment, CandidatePick, ConfidenceLabel, DegradedInput, GameInputs, Input, NewsSignal,
    ScoringRun, Side,
};

/// Result of the numeric pipeline before it is wrapped into a pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScore {
    /// Market/Elo blend before situational factors
    pub blended_probability: f64,
    /// Expected home margin in points
    pub projected_margin: f64,
    /// 0-100, above 50 favors home
    pub home_confidence: f64,
    pub recommended_side: Side,
    /// Confidence in the recommended side (50-100)
    pub confidence: f64,
    pub news_applied: bool,
}

pub struct ConfidenceCalculator<'a> {
    weights: &'a WeightConfig,
    config: &'a ConfidenceConfig,
    elo: EloModel,
}

impl<'a> ConfidenceCalculator<'a> {
    pub fn new(weights: &'a WeightConfig, config: &'a ConfidenceConfig) -> Self {
        Self {
            weights,
            config,
            elo: EloModel::from_weights(weights),
        }
    }

    pub fn elo(&self) -> &EloModel {
        &self.elo
    }

    /// Weighted blend of market and Elo home probabilities
    pub fn blend(&self, market_probability: f64, elo_probability: f64) -> f64 {
        let market = clamp_probability(market_probability);
        let elo = clamp_probability(elo_probability);
        clamp_probability(
            PICK_EM_PROBABILITY
                + self.weights.market_weight * (market - PICK_EM_PROBABILITY)
                + self.weights.elo_weight * (elo - PICK_EM_PROBABILITY),
        )
    }

    /// Run the pipeline on already-resolved components
    pub fn score_components(
        &self,
        market_probability: Input<f64>,
        elo_probability: Input<f64>,
        adjustments: &[Adjustment],
        news: Option<&NewsSignal>,
    ) -> ConfidenceScore {
        let blended = self.blend(
            resolve_probability(market_probability),
            resolve_probability(elo_probability),
        );

        let baseline = probability_to_spread(blended);
        let situational: f64 = adjustments
            .iter()
            .map(|a| a.points)
            .filter(|p| p.is_finite())
            .sum();
        let statistical = spread_to_probability(baseline + situational) * 100.0;

        let news = apply_news(self.config, statistical, news);
        let home_confidence = clamp_confidence(news.home_confidence);
        let (recommended_side, confidence) = self.recommend(home_confidence);

        ConfidenceScore {
            blended_probability: blended,
            projected_margin: probability_to_spread(home_confidence / 100.0),
            home_confidence,
            recommended_side,
            confidence,
            news_applied: news.applied,
        }
    }

    /// Side favored by a home confidence, with the tiebreak at exactly 50
    pub fn recommend(&self, home_confidence: f64) -> (Side, f64) {
        if home_confidence > 50.0 {
            (Side::Home, home_confidence)
        } else if home_confidence < 50.0 {
            (Side::Away, 100.0 - home_confidence)
        } else {
            (self.config.tiebreak.side(), 50.0)
        }
    }

    pub fn label(&self, confidence: f64) -> ConfidenceLabel {
        if confidence >= self.config.strong_threshold {
            ConfidenceLabel::Strong
        } else if confidence >= self.config.moderate_threshold {
            ConfidenceLabel::Moderate
        } else {
            ConfidenceLabel::Weak
        }
    }

    /// Score one game from its gathered inputs
    pub fn score_game(&self, game: &GameInputs) -> CandidatePick {
        let market_lines = game.effective_market();
        let market = no_vig_home_probability(market_lines.home_moneyline, market_lines.away_moneyline);
        let elo_probability = self.elo.win_probability(game.ratings.home, game.ratings.away);

        let mut degraded = Vec::new();
        if market.degraded {
            degraded.push(DegradedInput::MarketOdds);
        }
        if game.ratings.home.is_missing() {
            degraded.push(DegradedInput::HomeRating);
        }
        if game.ratings.away.is_missing() {
            degraded.push(DegradedInput::AwayRating);
        }
        if market_lines.spread.is_missing() {
            degraded.push(DegradedInput::Spread);
        }

        let report = situational_adjustments(self.weights, game, &market_lines);
        degraded.extend(report.degraded.iter().copied());

        let market_input = if market.degraded {
            Input::Missing
        } else {
            Input::Known(market.home)
        };
        let elo_input = if game.ratings.home.is_known() && game.ratings.away.is_known() {
            Input::Known(elo_probability)
        } else {
            Input::Missing
        };

        let score = self.score_components(
            market_input,
            elo_input,
            &report.adjustments,
            game.news.as_ref(),
        );

        if !degraded.is_empty() {
            debug!(
                game_id = %game.game_id,
                degraded = ?degraded,
                "scored with neutral defaults for missing inputs"
            );
        }
        if score.news_applied {
            info!(game_id = %game.game_id, "news adjustment applied");
        }

        CandidatePick {
            game_id: game.game_id.clone(),
            home: game.home.clone(),
            away: game.away.clone(),
            market_probability: market.home,
            elo_probability,
            adjustments: report.adjustments,
            projected_margin: score.projected_margin,
            spread: market_lines.spread.known(),
            home_confidence: score.home_confidence,
            confidence: score.confidence,
            recommended_side: score.recommended_side,
            label: self.label(score.confidence),
            news_applied: score.news_applied,
            degraded,
        }
    }

    /// Score a slate of independent games into one run
    pub fn score_slate(&self, profile: &str, games: &[GameInputs]) -> ScoringRun {
        let picks: Vec<CandidatePick> = games.iter().map(|g| self.score_game(g)).collect();
        let run = ScoringRun::new(profile, picks);
        info!(
            run_id = %run.run_id,
            profile,
            games = run.picks.len(),
            degraded = run.degraded_count(),
            "scoring run complete"
        );
        run
    }
}
