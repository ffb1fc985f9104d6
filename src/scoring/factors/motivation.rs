use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, Input, Sides, TeamStanding};

/// Largest motivation edge in points, either way
const MAX_MOTIVATION_POINTS: f64 = 2.0;

/// Motivation for a team still alive with nothing settled
const BASE_MOTIVATION: f64 = 0.5;

/// Motivation of an eliminated team at the start of the season
const ELIMINATED_MOTIVATION: f64 = 0.4;

/// Drop in motivation for a clinched team by the final week
const CLINCHED_LETDOWN: f64 = 0.2;

/// Playoff pressure score in [0, 1].
///
/// Bubble teams (near .500) score highest late in the season, eliminated
/// teams fade as the season progresses, and clinched teams ease off.
pub fn motivation_score(standing: &TeamStanding, week: u32, season_weeks: u32) -> f64 {
    let progress = if season_weeks == 0 {
        1.0
    } else {
        (week as f64 / season_weeks as f64).clamp(0.0, 1.0)
    };
    // Zero through midseason, rising to one at the final week
    let lateness = ((progress - 0.5) / 0.5).clamp(0.0, 1.0);

    if standing.eliminated {
        return ELIMINATED_MOTIVATION * (1.0 - progress);
    }
    if standing.clinched {
        return BASE_MOTIVATION - CLINCHED_LETDOWN * lateness;
    }

    let bubble = (1.0 - (standing.win_pct() - 0.5).abs() * 4.0).max(0.0);
    BASE_MOTIVATION + (1.0 - BASE_MOTIVATION) * bubble * lateness
}

/// Motivation differential as a capped spread equivalent
pub fn motivation(
    weights: &WeightConfig,
    standings: &Sides<Input<TeamStanding>>,
    week: u32,
    season_weeks: u32,
) -> Adjustment {
    let (home, away) = match (&standings.home, &standings.away) {
        (Input::Known(home), Input::Known(away)) => (home, away),
        _ => return Adjustment::none(Factor::Motivation).with_detail("standings unavailable"),
    };

    let home_score = motivation_score(home, week, season_weeks);
    let away_score = motivation_score(away, week, season_weeks);
    let points = ((home_score - away_score) * weights.motivation_weight)
        .clamp(-MAX_MOTIVATION_POINTS, MAX_MOTIVATION_POINTS);

    if points == 0.0 {
        return Adjustment::none(Factor::Motivation);
    }
    Adjustment::new(Factor::Motivation, points).with_detail(format!(
        "motivation home {home_score:.2} / away {away_score:.2}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_team_peaks_late() {
        let bubble = TeamStanding::record(7, 7);
        let early = motivation_score(&bubble, 4, 18);
        let late = motivation_score(&bubble, 16, 18);
        assert_eq!(early, BASE_MOTIVATION);
        assert!(late > early);
        assert!(late <= 1.0);
    }

    #[test]
    fn test_bubble_beats_runaway_leader() {
        let bubble = TeamStanding::record(7, 7);
        let leader = TeamStanding::record(13, 1);
        assert!(motivation_score(&bubble, 15, 18) > motivation_score(&leader, 15, 18));
    }

    #[test]
    fn test_eliminated_motivation_decays() {
        let out = TeamStanding {
            eliminated: true,
            ..TeamStanding::record(3, 10)
        };
        let w13 = motivation_score(&out, 13, 18);
        let w17 = motivation_score(&out, 17, 18);
        assert!(w17 < w13);
        assert!(w13 < BASE_MOTIVATION);
    }

    #[test]
    fn test_motivation_is_capped() {
        let weights = WeightConfig {
            motivation_weight: 50.0,
            ..WeightConfig::default()
        };
        let bubble = TeamStanding::record(8, 8);
        let out = TeamStanding {
            eliminated: true,
            ..TeamStanding::record(2, 14)
        };
        let adj = motivation(
            &weights,
            &Sides::new(Input::Known(bubble), Input::Known(out)),
            17,
            18,
        );
        assert_eq!(adj.points, MAX_MOTIVATION_POINTS);

        let adj = motivation(
            &weights,
            &Sides::new(Input::Known(out), Input::Known(bubble)),
            17,
            18,
        );
        assert_eq!(adj.points, -MAX_MOTIVATION_POINTS);
    }

    #[test]
    fn test_missing_standings_are_neutral() {
        let adj = motivation(
            &WeightConfig::default(),
            &Sides::new(Input::Known(TeamStanding::record(8, 8)), Input::Missing),
            17,
            18,
        );
        assert!(adj.is_neutral());
    }
}
