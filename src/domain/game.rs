use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::input::Input;

/// Regular-season length used when a slate does not say otherwise
pub const DEFAULT_SEASON_WEEKS: u32 = 18;

/// Side of a game (HOME or AWAY)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "HOME",
            Side::Away => "AWAY",
        }
    }

    /// +1.0 for home, -1.0 for away (home-perspective sign)
    pub fn sign(&self) -> f64 {
        match self {
            Side::Home => 1.0,
            Side::Away => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Team identifier (e.g., "KC", "BUF")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A value per side of a game
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Default"
))]
pub struct Sides<T> {
    #[serde(default)]
    pub home: T,
    #[serde(default)]
    pub away: T,
}

impl<T> Sides<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    /// Closed roof: weather never applies
    #[serde(default)]
    pub dome: bool,
    /// Neither team is at home
    #[serde(default)]
    pub neutral_site: bool,
}

impl Venue {
    pub fn outdoor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dome: false,
            neutral_site: false,
        }
    }

    pub fn dome(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dome: true,
            neutral_site: false,
        }
    }

    pub fn neutral(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dome: false,
            neutral_site: true,
        }
    }
}

/// Published market for one game.
///
/// `spread` is the home line: -3.5 means home is favored by 3.5.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketLines {
    #[serde(default)]
    pub spread: Input<f64>,
    #[serde(default)]
    pub total: Input<f64>,
    #[serde(default)]
    pub home_moneyline: Input<i32>,
    #[serde(default)]
    pub away_moneyline: Input<i32>,
}

impl MarketLines {
    pub fn moneylines(home: i32, away: i32) -> Self {
        Self {
            home_moneyline: Input::Known(home),
            away_moneyline: Input::Known(away),
            ..Self::default()
        }
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = Input::Known(spread);
        self
    }

    /// Overlay a live snapshot: its known values win, its gaps fall back to `self`
    pub fn overlay(&self, live: &MarketLines) -> MarketLines {
        MarketLines {
            spread: live.spread.or(self.spread),
            total: live.total.or(self.total),
            home_moneyline: live.home_moneyline.or(self.home_moneyline),
            away_moneyline: live.away_moneyline.or(self.away_moneyline),
        }
    }

    /// Side the market favors, from the spread first and moneylines second
    pub fn favorite(&self) -> Option<Side> {
        if let Input::Known(spread) = self.spread {
            if spread < 0.0 {
                return Some(Side::Home);
            }
            if spread > 0.0 {
                return Some(Side::Away);
            }
            return None;
        }
        match (self.home_moneyline, self.away_moneyline) {
            (Input::Known(home), Input::Known(away)) if home < away => Some(Side::Home),
            (Input::Known(home), Input::Known(away)) if away < home => Some(Side::Away),
            (Input::Known(home), Input::Missing) if home < 0 => Some(Side::Home),
            (Input::Missing, Input::Known(away)) if away < 0 => Some(Side::Away),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Sustained wind in mph
    pub wind_mph: f64,
    /// Chance of precipitation during the game (0-1)
    pub precipitation_probability: f64,
    #[serde(default)]
    pub temperature_f: Option<f64>,
}

/// Injury summary for one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InjuryReport {
    /// Starting quarterback ruled out
    #[serde(default)]
    pub qb_out: bool,
    /// Offensive linemen ruled out
    #[serde(default)]
    pub oline_out: u8,
    /// Defensive backs ruled out
    #[serde(default)]
    pub secondary_out: u8,
}

/// A completed game from one team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentGame {
    pub points_for: u32,
    pub points_against: u32,
}

impl RecentGame {
    pub fn new(points_for: u32, points_against: u32) -> Self {
        Self {
            points_for,
            points_against,
        }
    }

    pub fn margin(&self) -> f64 {
        self.points_for as f64 - self.points_against as f64
    }
}

/// Season record and playoff status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStanding {
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    /// Mathematically out of the playoffs
    #[serde(default)]
    pub eliminated: bool,
    /// Playoff spot secured
    #[serde(default)]
    pub clinched: bool,
}

impl TeamStanding {
    pub fn record(wins: u32, losses: u32) -> Self {
        Self {
            wins,
            losses,
            ..Self::default()
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties as half wins; 0.5 before any games
    pub fn win_pct(&self) -> f64 {
        if self.games() == 0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / self.games() as f64
    }
}

/// Head-to-head context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub divisional: bool,
    /// Side that lost the previous meeting
    #[serde(default)]
    pub revenge: Option<Side>,
}

/// Output of an external news/injury analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSignal {
    pub side: Side,
    /// Suggested confidence shift in 0-100 points (sign ignored, `side` gives direction)
    pub confidence_delta: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Everything the scoring core needs for one game, already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInputs {
    pub game_id: String,
    pub week: u32,
    #[serde(default = "default_season_weeks")]
    pub season_weeks: u32,
    pub kickoff: DateTime<Utc>,
    pub home: TeamId,
    pub away: TeamId,
    pub venue: Venue,
    #[serde(default)]
    pub market: MarketLines,
    /// Latest in-week snapshot; known values supersede `market`
    #[serde(default)]
    pub live_market: Option<MarketLines>,
    #[serde(default)]
    pub ratings: Sides<Input<f64>>,
    #[serde(default)]
    pub rest_days: Sides<Input<u32>>,
    #[serde(default)]
    pub weather: Input<WeatherObservation>,
    #[serde(default)]
    pub injuries: Sides<Input<InjuryReport>>,
    #[serde(default)]
    pub recent_games: Sides<Vec<RecentGame>>,
    #[serde(default)]
    pub standings: Sides<Input<TeamStanding>>,
    /// Share of offensive plays that are passes (0-1)
    #[serde(default)]
    pub pass_reliance: Sides<Input<f64>>,
    #[serde(default)]
    pub matchup: Matchup,
    #[serde(default)]
    pub news: Option<NewsSignal>,
}

fn default_season_weeks() -> u32 {
    DEFAULT_SEASON_WEEKS
}

impl GameInputs {
    /// Bare game with every optional input missing
    pub fn new(
        game_id: impl Into<String>,
        week: u32,
        kickoff: DateTime<Utc>,
        home: TeamId,
        away: TeamId,
        venue: Venue,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            week,
            season_weeks: DEFAULT_SEASON_WEEKS,
            kickoff,
            home,
            away,
            venue,
            market: MarketLines::default(),
            live_market: None,
            ratings: Sides::default(),
            rest_days: Sides::default(),
            weather: Input::Missing,
            injuries: Sides::default(),
            recent_games: Sides::default(),
            standings: Sides::default(),
            pass_reliance: Sides::default(),
            matchup: Matchup::default(),
            news: None,
        }
    }

    pub fn with_market(mut self, market: MarketLines) -> Self {
        self.market = market;
        self
    }

    pub fn with_live_market(mut self, live: MarketLines) -> Self {
        self.live_market = Some(live);
        self
    }

    pub fn with_ratings(mut self, home: f64, away: f64) -> Self {
        self.ratings = Sides::new(Input::Known(home), Input::Known(away));
        self
    }

    pub fn with_rest_days(mut self, home: u32, away: u32) -> Self {
        self.rest_days = Sides::new(Input::Known(home), Input::Known(away));
        self
    }

    pub fn with_weather(mut self, weather: WeatherObservation) -> Self {
        self.weather = Input::Known(weather);
        self
    }

    pub fn with_injuries(mut self, home: InjuryReport, away: InjuryReport) -> Self {
        self.injuries = Sides::new(Input::Known(home), Input::Known(away));
        self
    }

    pub fn with_news(mut self, news: NewsSignal) -> Self {
        self.news = Some(news);
        self
    }

    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Opening market with the live snapshot laid over it
    pub fn effective_market(&self) -> MarketLines {
        match &self.live_market {
            Some(live) => self.market.overlay(live),
            None => self.market,
        }
    }
}
