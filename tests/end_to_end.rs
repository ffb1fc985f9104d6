//! End-to-end scenarios across scoring, survivor and Points-Plus.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pickem::config::{AppConfig, DiversificationConfig, SurvivorConfig, DEFAULT_PROFILE};
use pickem::domain::{
    CandidatePick, ConfidenceLabel, DegradedInput, EntrySnapshot, GameInputs, MarketLines, PoolSnapshot,
    Side, TeamId, TeamWeekOption, Venue,
};
use pickem::providers::{gather_slate, OddsProvider, ProviderContext, ScheduledGame};
use pickem::scoring::{ConfidenceCalculator, RatingSnapshot};
use pickem::strategy::{PickRole, PointsPlusRules, PointsPlusSelector};
use pickem::survivor::{
    Assignment, DiversificationStrategy, Diversifier, SurvivorEvEngine, UnresolvedReason,
};

fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 10, 18, 0, 0).unwrap()
}

fn bare_game(venue: Venue) -> GameInputs {
    GameInputs::new(
        "2024-W10-NYJ-ARI",
        10,
        kickoff(),
        TeamId::from("ARI"),
        TeamId::from("NYJ"),
        venue,
    )
}

#[test]
fn test_scenario_a_moneyline_only_recommends_home() {
    let config = AppConfig::default_config();
    let weights = config.profile(DEFAULT_PROFILE).unwrap();
    let calculator = ConfidenceCalculator::new(weights, &config.confidence);

    // No situational factors at all: neutral site under a roof
    let game = bare_game(Venue {
        name: "Neutral Dome".to_string(),
        dome: true,
        neutral_site: true,
    })
    .with_market(MarketLines::moneylines(-150, 130));

    let pick = calculator.score_game(&game);
    assert!(pick.adjustments.iter().all(|a| a.is_neutral()));
    assert_eq!(pick.recommended_side, Side::Home);
    assert!(
        pick.confidence > 50.0 && pick.confidence < 65.0,
        "confidence {} outside (50, 65)",
        pick.confidence
    );
}

#[test]
fn test_scenario_a_with_home_field_stays_in_range() {
    let config = AppConfig::default_config();
    let weights = config.profile(DEFAULT_PROFILE).unwrap();
    let calculator = ConfidenceCalculator::new(weights, &config.confidence);

    let game = bare_game(Venue::dome("State Farm Stadium"))
        .with_market(MarketLines::moneylines(-150, 130));
    let pick = calculator.score_game(&game);

    assert_eq!(pick.recommended_side, Side::Home);
    assert!(pick.confidence > 50.0 && pick.confidence < 65.0, "pick={pick:?}");
}

#[test]
fn test_scenario_b_block_with_more_entries_than_teams() {
    let engine = SurvivorEvEngine::new(SurvivorConfig::default());
    let config = DiversificationConfig::default();
    let pool = PoolSnapshot::new("office", 50, 30);
    let options = vec![
        TeamWeekOption::new("X", 6, 0.8),
        TeamWeekOption::new("Y", 6, 0.6),
    ];
    let entries = vec![
        EntrySnapshot::active("e1"),
        EntrySnapshot::active("e2"),
        EntrySnapshot::active("e3"),
    ];

    let plan = Diversifier::new(&engine, &config).assign(
        &entries,
        &pool,
        &options,
        6,
        DiversificationStrategy::Block,
    );

    assert_eq!(plan.assigned().count(), 2);
    assert_eq!(plan.distinct_teams(), 2);
    let unresolved: Vec<_> = plan.unresolved().collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(
        unresolved[0].assignment,
        Assignment::Unresolved {
            reason: UnresolvedReason::NoEligibleTeam
        }
    );
}

#[test]
fn test_scenario_c_correlated_single_qualifier() {
    let engine = SurvivorEvEngine::new(SurvivorConfig::default());
    let config = DiversificationConfig {
        correlated_floor: 0.65,
        ..DiversificationConfig::default()
    };
    let pool = PoolSnapshot::new("office", 50, 30)
        .with_public_pick("Y", 0.05)
        .with_public_pick("X", 0.7);
    // Y has the better EV but sits below the floor
    let options = vec![
        TeamWeekOption::new("X", 6, 0.72),
        TeamWeekOption::new("Y", 6, 0.6),
        TeamWeekOption::new("Z", 6, 0.55),
    ];
    let entries: Vec<EntrySnapshot> = ["e1", "e2", "e3", "e4"]
        .iter()
        .map(|id| EntrySnapshot::active(*id))
        .collect();

    let plan = Diversifier::new(&engine, &config).assign(
        &entries,
        &pool,
        &options,
        6,
        DiversificationStrategy::Correlated,
    );

    assert_eq!(plan.assigned().count(), 4);
    assert!(plan
        .entries
        .iter()
        .all(|e| e.team() == Some(&TeamId::from("X"))));
}

fn lined_pick(game_id: &str, home_line: f64, projected_margin: f64) -> CandidatePick {
    let home_confidence = 50.0 + projected_margin;
    CandidatePick {
        game_id: game_id.to_string(),
        home: TeamId::from(format!("{game_id}-home").as_str()),
        away: TeamId::from(format!("{game_id}-away").as_str()),
        market_probability: home_confidence / 100.0,
        elo_probability: 0.5,
        adjustments: Vec::new(),
        projected_margin,
        spread: Some(home_line),
        home_confidence,
        confidence: home_confidence.max(100.0 - home_confidence),
        recommended_side: if projected_margin >= 0.0 {
            Side::Home
        } else {
            Side::Away
        },
        label: ConfidenceLabel::Weak,
        news_applied: false,
        degraded: Vec::new(),
    }
}

#[test]
fn test_scenario_d_balanced_points_plus_adds_underdog() {
    let picks = vec![
        // Favorites covering by 7, 6, 5
        lined_pick("f1", -3.0, 10.0),
        lined_pick("f2", -3.0, 9.0),
        lined_pick("f3", -3.0, 8.0),
        // Home underdog covering by 6.5
        lined_pick("u1", 3.0, 3.5),
        // Weaker underdog covering by 1
        lined_pick("u2", 7.0, -6.0),
    ];

    let unconstrained = PointsPlusSelector::new(PointsPlusRules {
        max_games: Some(4),
        ..PointsPlusRules::new(4)
    })
    .unwrap()
    .select(&picks)
    .unwrap();
    assert_eq!(unconstrained.favorites, 3);
    assert_eq!(unconstrained.underdogs, 1);

    let balanced = PointsPlusSelector::new(PointsPlusRules {
        balance_favorites: true,
        ..PointsPlusRules::new(4)
    })
    .unwrap()
    .select(&picks)
    .unwrap();

    assert_eq!(balanced.favorites, balanced.underdogs);
    assert!(balanced.underdogs >= 2);
    assert!(balanced
        .picks
        .iter()
        .any(|p| p.game_id == "u2" && p.role == PickRole::Underdog));
    assert!(balanced.total_expected_points < unconstrained.total_expected_points);
}

struct FixedOdds;

impl OddsProvider for FixedOdds {
    fn opening_lines(&self, game_id: &str) -> Option<MarketLines> {
        match game_id {
            "g1" => Some(MarketLines::moneylines(-400, 320).with_spread(-8.5)),
            "g2" => Some(MarketLines::moneylines(-130, 110).with_spread(-2.0)),
            _ => None,
        }
    }

    fn live_lines(&self, _game_id: &str) -> Option<MarketLines> {
        None
    }
}

fn scheduled(game_id: &str, home: &str, away: &str) -> ScheduledGame {
    ScheduledGame {
        game_id: game_id.to_string(),
        week: 10,
        season_weeks: 18,
        kickoff: kickoff(),
        home: TeamId::from(home),
        away: TeamId::from(away),
        venue: Venue::dome("Dome"),
        matchup: Default::default(),
    }
}

#[test]
fn test_gather_score_and_rank_survivor() {
    let mut ratings = RatingSnapshot::new();
    let as_of = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
    ratings.insert(TeamId::from("BAL"), as_of, 1650.0);
    ratings.insert(TeamId::from("CLE"), as_of, 1420.0);

    let odds = FixedOdds;
    let ctx = ProviderContext::new().with_odds(&odds).with_ratings(&ratings);
    let schedule = vec![
        scheduled("g1", "BAL", "CLE"),
        scheduled("g2", "MIN", "JAX"),
        scheduled("g3", "NO", "ATL"),
    ];
    let games = gather_slate(&ctx, &schedule);

    let config = AppConfig::default_config();
    let calculator =
        ConfidenceCalculator::new(config.profile(DEFAULT_PROFILE).unwrap(), &config.confidence);
    let run = calculator.score_slate(DEFAULT_PROFILE, &games);
    assert_eq!(run.picks.len(), 3);
    // No history provider, so every game is missing rest days
    assert_eq!(run.degraded_count(), 3);
    assert!(!run.picks[0].degraded.contains(&DegradedInput::HomeRating));
    assert!(run.picks[1].degraded.contains(&DegradedInput::HomeRating));
    assert!(!run.picks[1].degraded.contains(&DegradedInput::MarketOdds));
    assert!(run.picks[2].degraded.contains(&DegradedInput::MarketOdds));
    assert!(run.picks[2].degraded.contains(&DegradedInput::Spread));

    let options = TeamWeekOption::from_candidates(&run.picks, 10);
    let engine = SurvivorEvEngine::from_config(config.survivor.clone());
    let entry = EntrySnapshot::active("mine").with_used(["MIN"]);
    let pool = PoolSnapshot::new("office", 200, 150);

    let ranked = engine.rank(&entry, &pool, &options, 10).unwrap();
    assert_eq!(ranked[0].team, TeamId::from("BAL"));
    assert!(ranked.iter().all(|p| p.team != TeamId::from("MIN")));
    assert_eq!(ranked.len(), 5);
}
