//! Situational factor calculators
//!
//! Each calculator is a pure function returning an [`Adjustment`] on the
//! point-spread scale from the home perspective, so factors add up before
//! the total is folded back into a probability.

mod form;
mod home_field;
mod injury;
mod motivation;
mod news;
mod rest;
mod rivalry;
mod weather;

pub use form::{form_score, recent_form};
pub use home_field::home_field;
pub use injury::{injuries, injury_penalty};
pub use motivation::{motivation, motivation_score};
pub use news::{apply_news, NewsOutcome};
pub use rest::{rest, rest_days_between};
pub use rivalry::{divisional, revenge};
pub use weather::{weather, weather_severity};

use crate::config::WeightConfig;
use crate::domain::{Adjustment, DegradedInput, GameInputs, MarketLines};

/// Ordered adjustments for one game plus the inputs that were missing
#[derive(Debug, Clone, Default)]
pub struct SituationalReport {
    pub adjustments: Vec<Adjustment>,
    pub degraded: Vec<DegradedInput>,
}

impl SituationalReport {
    pub fn total_points(&self) -> f64 {
        self.adjustments.iter().map(|a| a.points).sum()
    }
}

/// Run every calculator for a game, in a fixed order
pub fn situational_adjustments(
    weights: &WeightConfig,
    game: &GameInputs,
    market: &MarketLines,
) -> SituationalReport {
    let favorite = market.favorite();
    let mut degraded = Vec::new();

    if game.rest_days.home.is_missing() || game.rest_days.away.is_missing() {
        degraded.push(DegradedInput::RestDays);
    }
    if !game.venue.dome && game.weather.is_missing() {
        degraded.push(DegradedInput::Weather);
    }
    if game.standings.home.is_missing() || game.standings.away.is_missing() {
        degraded.push(DegradedInput::Standings);
    }
    if game.injuries.home.is_missing() || game.injuries.away.is_missing() {
        degraded.push(DegradedInput::Injuries);
    }

    let adjustments = vec![
        home_field(weights, &game.venue),
        rest(weights, &game.rest_days),
        weather(
            weights,
            &game.venue,
            game.weather.as_ref(),
            &game.pass_reliance,
            favorite,
        ),
        injuries(weights, &game.injuries),
        recent_form(weights, &game.recent_games),
        motivation(weights, &game.standings, game.week, game.season_weeks),
        divisional(weights, &game.matchup, favorite),
        revenge(weights, &game.matchup),
    ];

    SituationalReport {
        adjustments,
        degraded,
    }
}
