//! Gather-then-score boundary.
//!
//! External data (odds, ratings, weather, injuries, team history, news) is
//! collected through the provider traits into a plain [`GameInputs`]
//! record before any scoring runs. Providers are passed in explicitly via
//! [`ProviderContext`]; anything a provider cannot supply becomes
//! `Input::Missing`, never an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    GameInputs, InjuryReport, Input, Matchup, MarketLines, NewsSignal, RecentGame, Sides,
    TeamId, TeamStanding, Venue, WeatherObservation, DEFAULT_SEASON_WEEKS,
};
use crate::scoring::elo::RatingSnapshot;
use crate::scoring::factors::rest_days_between;

#[cfg_attr(test, mockall::automock)]
pub trait OddsProvider {
    /// Opening market for a game
    fn opening_lines(&self, game_id: &str) -> Option<MarketLines>;

    /// Latest in-week snapshot, if the provider tracks one
    fn live_lines(&self, game_id: &str) -> Option<MarketLines>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RatingProvider {
    /// Rating in effect on `as_of`
    fn rating(&self, team: &TeamId, as_of: NaiveDate) -> Option<f64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait WeatherProvider {
    fn forecast(&self, venue: &Venue, kickoff: DateTime<Utc>) -> Option<WeatherObservation>;
}

#[cfg_attr(test, mockall::automock)]
pub trait InjuryProvider {
    fn report(&self, team: &TeamId, week: u32) -> Option<InjuryReport>;
}

/// Schedule and results history for rest, form, motivation and weather exposure
#[cfg_attr(test, mockall::automock)]
pub trait TeamHistoryProvider {
    /// Kickoff of the team's previous game before `kickoff`
    fn previous_kickoff(&self, team: &TeamId, kickoff: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Completed games before `kickoff`, newest first
    fn recent_games(&self, team: &TeamId, kickoff: DateTime<Utc>) -> Vec<RecentGame>;

    fn standing(&self, team: &TeamId, week: u32) -> Option<TeamStanding>;

    /// Share of offensive plays that are passes (0-1)
    fn pass_reliance(&self, team: &TeamId) -> Option<f64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait NewsProvider {
    fn signal(&self, game_id: &str) -> Option<NewsSignal>;
}

impl RatingProvider for RatingSnapshot {
    fn rating(&self, team: &TeamId, as_of: NaiveDate) -> Option<f64> {
        self.rating_as_of(team, as_of).known()
    }
}

/// Providers available for one scoring call. Any of them may be absent.
#[derive(Default, Clone, Copy)]
pub struct ProviderContext<'a> {
    pub odds: Option<&'a dyn OddsProvider>,
    pub ratings: Option<&'a dyn RatingProvider>,
    pub weather: Option<&'a dyn WeatherProvider>,
    pub injuries: Option<&'a dyn InjuryProvider>,
    pub history: Option<&'a dyn TeamHistoryProvider>,
    pub news: Option<&'a dyn NewsProvider>,
}

impl<'a> ProviderContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_odds(mut self, odds: &'a dyn OddsProvider) -> Self {
        self.odds = Some(odds);
        self
    }

    pub fn with_ratings(mut self, ratings: &'a dyn RatingProvider) -> Self {
        self.ratings = Some(ratings);
        self
    }

    pub fn with_weather(mut self, weather: &'a dyn WeatherProvider) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_injuries(mut self, injuries: &'a dyn InjuryProvider) -> Self {
        self.injuries = Some(injuries);
        self
    }

    pub fn with_history(mut self, history: &'a dyn TeamHistoryProvider) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_news(mut self, news: &'a dyn NewsProvider) -> Self {
        self.news = Some(news);
        self
    }
}

/// A game on the schedule, before any external data is attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_id: String,
    pub week: u32,
    #[serde(default = "default_season_weeks")]
    pub season_weeks: u32,
    pub kickoff: DateTime<Utc>,
    pub home: TeamId,
    pub away: TeamId,
    pub venue: Venue,
    #[serde(default)]
    pub matchup: Matchup,
}

fn default_season_weeks() -> u32 {
    DEFAULT_SEASON_WEEKS
}

/// Collect everything the scorer needs for one game
pub fn gather(ctx: &ProviderContext<'_>, game: &ScheduledGame) -> GameInputs {
    let mut inputs = GameInputs::new(
        game.game_id.clone(),
        game.week,
        game.kickoff,
        game.home.clone(),
        game.away.clone(),
        game.venue.clone(),
    );
    inputs.season_weeks = game.season_weeks;
    inputs.matchup = game.matchup;

    if let Some(odds) = ctx.odds {
        if let Some(market) = odds.opening_lines(&game.game_id) {
            inputs.market = market;
        }
        inputs.live_market = odds.live_lines(&game.game_id);
    }

    if let Some(ratings) = ctx.ratings {
        let as_of = game.kickoff.date_naive();
        inputs.ratings = Sides::new(
            ratings.rating(&game.home, as_of).into(),
            ratings.rating(&game.away, as_of).into(),
        );
    }

    // Nothing to fetch under a roof
    if !game.venue.dome {
        if let Some(weather) = ctx.weather {
            inputs.weather = weather.forecast(&game.venue, game.kickoff).into();
        }
    }

    if let Some(injuries) = ctx.injuries {
        inputs.injuries = Sides::new(
            injuries.report(&game.home, game.week).into(),
            injuries.report(&game.away, game.week).into(),
        );
    }

    if let Some(history) = ctx.history {
        let rest = |team: &TeamId| -> Input<u32> {
            history
                .previous_kickoff(team, game.kickoff)
                .map(|previous| rest_days_between(previous, game.kickoff))
                .into()
        };
        inputs.rest_days = Sides::new(rest(&game.home), rest(&game.away));
        inputs.recent_games = Sides::new(
            history.recent_games(&game.home, game.kickoff),
            history.recent_games(&game.away, game.kickoff),
        );
        inputs.standings = Sides::new(
            history.standing(&game.home, game.week).into(),
            history.standing(&game.away, game.week).into(),
        );
        inputs.pass_reliance = Sides::new(
            history.pass_reliance(&game.home).into(),
            history.pass_reliance(&game.away).into(),
        );
    }

    if let Some(news) = ctx.news {
        inputs.news = news.signal(&game.game_id);
    }

    debug!(
        game_id = %game.game_id,
        has_market = inputs.market.home_moneyline.is_known() || inputs.market.away_moneyline.is_known(),
        has_ratings = inputs.ratings.home.is_known() && inputs.ratings.away.is_known(),
        "inputs gathered"
    );
    inputs
}

/// Gather a whole schedule
pub fn gather_slate(ctx: &ProviderContext<'_>, schedule: &[ScheduledGame]) -> Vec<GameInputs> {
    schedule.iter().map(|game| gather(ctx, game)).collect()
}
