use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{CandidatePick, Side, TeamId};
use crate::scoring::probability::spread_to_probability;

/// Pool format a slate is ranked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolFormat {
    /// Graded on the game winner
    StraightUp,
    /// Graded on covering the published spread
    AgainstTheSpread,
    PointsPlus,
    Survivor,
}

impl PoolFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolFormat::StraightUp => "su",
            PoolFormat::AgainstTheSpread => "ats",
            PoolFormat::PointsPlus => "points_plus",
            PoolFormat::Survivor => "survivor",
        }
    }

    /// Whether picks in this format are graded against the line
    pub fn uses_spread(&self) -> bool {
        matches!(self, PoolFormat::AgainstTheSpread | PoolFormat::PointsPlus)
    }
}

impl fmt::Display for PoolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "su" | "straight_up" => Ok(PoolFormat::StraightUp),
            "ats" | "against_the_spread" => Ok(PoolFormat::AgainstTheSpread),
            "points_plus" => Ok(PoolFormat::PointsPlus),
            "survivor" => Ok(PoolFormat::Survivor),
            other => Err(format!("unknown pool format '{other}'")),
        }
    }
}

/// Side a pick takes against the line and how likely it is to cover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverProjection {
    pub side: Side,
    /// Expected margin over the line for `side` (points, >= 0 unless tied)
    pub cover_margin: f64,
    /// Probability `side` covers (0-1)
    pub cover_probability: f64,
    /// No line was available; projected against a line of zero
    pub line_missing: bool,
}

/// Project a pick against its home line.
///
/// The home team covers by `projected_margin + line`. An exact push keeps
/// the straight-up recommendation.
pub fn cover_projection(pick: &CandidatePick) -> CoverProjection {
    let line = pick.spread.filter(|s| s.is_finite());
    let home_margin = pick.projected_margin + line.unwrap_or(0.0);

    let side = if home_margin > 0.0 {
        Side::Home
    } else if home_margin < 0.0 {
        Side::Away
    } else {
        pick.recommended_side
    };
    let cover_margin = home_margin * side.sign();

    CoverProjection {
        side,
        cover_margin,
        cover_probability: spread_to_probability(cover_margin),
        line_missing: line.is_none(),
    }
}

/// One row of a ranked slate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPick {
    pub rank: usize,
    pub game_id: String,
    pub side: Side,
    pub team: TeamId,
    pub opponent: TeamId,
    /// 0-100 confidence for this format
    pub confidence: f64,
    /// Line for the picked side, if graded against the spread
    pub line: Option<f64>,
    pub degraded: bool,
}

/// Order a slate for a pool format, most confident first.
///
/// Straight-up and survivor formats rank by winner confidence; spread
/// formats rank by cover probability. Ties go to the lower game id.
pub fn rank_picks(picks: &[CandidatePick], format: PoolFormat) -> Vec<RankedPick> {
    let mut rows: Vec<RankedPick> = picks
        .iter()
        .map(|pick| {
            if format.uses_spread() {
                let cover = cover_projection(pick);
                let line = pick.spread.map(|home_line| home_line * cover.side.sign());
                RankedPick {
                    rank: 0,
                    game_id: pick.game_id.clone(),
                    side: cover.side,
                    team: pick.team(cover.side).clone(),
                    opponent: pick.team(cover.side.opposite()).clone(),
                    confidence: cover.cover_probability * 100.0,
                    line,
                    degraded: pick.is_degraded() || cover.line_missing,
                }
            } else {
                let side = pick.recommended_side;
                RankedPick {
                    rank: 0,
                    game_id: pick.game_id.clone(),
                    side,
                    team: pick.team(side).clone(),
                    opponent: pick.team(side.opposite()).clone(),
                    confidence: pick.confidence,
                    line: None,
                    degraded: pick.is_degraded(),
                }
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        OrderedFloat(b.confidence)
            .cmp(&OrderedFloat(a.confidence))
            .then_with(|| a.game_id.cmp(&b.game_id))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfidenceLabel;

    fn pick(game_id: &str, home_confidence: f64, margin: f64, spread: Option<f64>) -> CandidatePick {
        let side = if home_confidence >= 50.0 {
            Side::Home
        } else {
            Side::Away
        };
        CandidatePick {
            game_id: game_id.to_string(),
            home: TeamId::from(format!("{game_id}-H").as_str()),
            away: TeamId::from(format!("{game_id}-A").as_str()),
            market_probability: home_confidence / 100.0,
            elo_probability: 0.5,
            adjustments: Vec::new(),
            projected_margin: margin,
            spread,
            home_confidence,
            confidence: home_confidence.max(100.0 - home_confidence),
            recommended_side: side,
            label: ConfidenceLabel::Weak,
            news_applied: false,
            degraded: Vec::new(),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("ATS".parse(), Ok(PoolFormat::AgainstTheSpread));
        assert_eq!("points-plus".parse(), Ok(PoolFormat::PointsPlus));
        assert!("parlay".parse::<PoolFormat>().is_err());
    }

    #[test]
    fn test_cover_projection_uses_home_line() {
        // Home projected to win by 5, laying 3.5: home covers by 1.5
        let home = cover_projection(&pick("g1", 65.0, 5.0, Some(-3.5)));
        assert_eq!(home.side, Side::Home);
        assert!((home.cover_margin - 1.5).abs() < 1e-12);

        // Home projected to win by 2, laying 6.5: away covers by 4.5
        let away = cover_projection(&pick("g2", 56.0, 2.0, Some(-6.5)));
        assert_eq!(away.side, Side::Away);
        assert!((away.cover_margin - 4.5).abs() < 1e-12);
        assert!(away.cover_probability > 0.5);
    }

    #[test]
    fn test_push_keeps_recommended_side() {
        let cover = cover_projection(&pick("g1", 40.0, -3.0, Some(3.0)));
        assert_eq!(cover.side, Side::Away);
        assert_eq!(cover.cover_probability, 0.5);
    }

    #[test]
    fn test_su_ranking_by_confidence() {
        let picks = vec![
            pick("g1", 58.0, 2.0, None),
            pick("g2", 30.0, -6.0, None),
            pick("g3", 65.0, 4.0, None),
        ];
        let ranked = rank_picks(&picks, PoolFormat::StraightUp);
        let order: Vec<&str> = ranked.iter().map(|r| r.game_id.as_str()).collect();
        assert_eq!(order, vec!["g2", "g3", "g1"]);
        assert_eq!(ranked[0].side, Side::Away);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn test_ats_ranking_can_differ_from_su() {
        let picks = vec![
            // Big SU favorite, but laying too many points
            pick("g1", 80.0, 10.0, Some(-10.0)),
            // Small edge on the line
            pick("g2", 55.0, 1.5, Some(2.5)),
        ];
        let su = rank_picks(&picks, PoolFormat::StraightUp);
        let ats = rank_picks(&picks, PoolFormat::AgainstTheSpread);
        assert_eq!(su[0].game_id, "g1");
        assert_eq!(ats[0].game_id, "g2");
        assert_eq!(ats[0].line, Some(2.5));
    }

    #[test]
    fn test_ties_break_by_game_id() {
        let picks = vec![pick("b", 60.0, 3.0, None), pick("a", 60.0, 3.0, None)];
        let ranked = rank_picks(&picks, PoolFormat::StraightUp);
        assert_eq!(ranked[0].game_id, "a");
    }

    #[test]
    fn test_missing_line_is_flagged_for_ats() {
        let ranked = rank_picks(&[pick("g1", 60.0, 3.0, None)], PoolFormat::AgainstTheSpread);
        assert!(ranked[0].degraded);
        assert_eq!(ranked[0].line, None);
    }
}
