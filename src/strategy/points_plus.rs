//! Points-Plus selection
//!
//! A Points-Plus pool scores the margin by which each selected pick beats
//! its line. Each scored game offers one candidate (its against-the-spread
//! side) and the selector picks the subset with the highest expected
//! points that satisfies the pool's rules.
//!
//! With favorite/underdog balancing the search enumerates every pair count
//! `k` (k favorites + k underdogs, best first within each group) and every
//! pick'em count. Slates are small, so the search is exhaustive.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;
use tracing::{debug, info, warn};

use super::ranking::cover_projection;
use crate::domain::{CandidatePick, Side, TeamId};
use crate::error::SelectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPlusRules {
    /// Minimum number of games that must be selected
    pub min_games: usize,
    /// Maximum number of games; unbounded when absent
    #[serde(default)]
    pub max_games: Option<usize>,
    /// Favorites and underdogs must be picked in equal numbers
    #[serde(default)]
    pub balance_favorites: bool,
    /// Games lined at exactly zero may be selected
    #[serde(default)]
    pub allow_pickem: bool,
}

impl PointsPlusRules {
    pub fn new(min_games: usize) -> Self {
        Self {
            min_games,
            max_games: None,
            balance_favorites: false,
            allow_pickem: false,
        }
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.min_games == 0 {
            return Err(SelectionError::InvalidRules(
                "min_games must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_games {
            if max < self.min_games {
                return Err(SelectionError::InvalidRules(format!(
                    "max_games ({max}) is below min_games ({})",
                    self.min_games
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickRole {
    Favorite,
    Underdog,
    PickEm,
}

impl PickRole {
    /// Role of a side getting `line` points (negative = laying points)
    pub fn from_line(line: f64) -> Self {
        if line < 0.0 {
            PickRole::Favorite
        } else if line > 0.0 {
            PickRole::Underdog
        } else {
            PickRole::PickEm
        }
    }
}

impl fmt::Display for PickRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickRole::Favorite => f.write_str("favorite"),
            PickRole::Underdog => f.write_str("underdog"),
            PickRole::PickEm => f.write_str("pick'em"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsPlusCandidate {
    pub game_id: String,
    pub team: TeamId,
    pub side: Side,
    /// Line for the selected side
    pub line: f64,
    pub role: PickRole,
    /// Expected margin over the line
    pub expected_points: f64,
    pub cover_probability: f64,
}

impl PointsPlusCandidate {
    /// Candidate for the side expected to cover; `None` when the game has no line
    pub fn from_pick(pick: &CandidatePick) -> Option<Self> {
        let home_line = pick.spread.filter(|s| s.is_finite())?;
        let cover = cover_projection(pick);
        let line = home_line * cover.side.sign();

        Some(Self {
            game_id: pick.game_id.clone(),
            team: pick.team(cover.side).clone(),
            side: cover.side,
            line,
            role: PickRole::from_line(line),
            expected_points: cover.cover_margin,
            cover_probability: cover.cover_probability,
        })
    }
}

/// Best first; ties by cover probability, then game id
fn by_value(a: &PointsPlusCandidate, b: &PointsPlusCandidate) -> Ordering {
    OrderedFloat(b.expected_points)
        .cmp(&OrderedFloat(a.expected_points))
        .then_with(|| OrderedFloat(b.cover_probability).cmp(&OrderedFloat(a.cover_probability)))
        .then_with(|| a.game_id.cmp(&b.game_id))
}

fn prefix_sums(group: &[PointsPlusCandidate]) -> Vec<f64> {
    let mut sums = Vec::with_capacity(group.len() + 1);
    sums.push(0.0);
    for candidate in group {
        let last = sums.last().copied().unwrap_or(0.0);
        sums.push(last + candidate.expected_points);
    }
    sums
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsPlusSelection {
    pub picks: Vec<PointsPlusCandidate>,
    pub total_expected_points: f64,
    pub favorites: usize,
    pub underdogs: usize,
    pub pickems: usize,
}

impl PointsPlusSelection {
    fn from_picks(mut picks: Vec<PointsPlusCandidate>) -> Self {
        picks.sort_by(by_value);
        let count = |role: PickRole| picks.iter().filter(|p| p.role == role).count();
        Self {
            total_expected_points: picks.iter().map(|p| p.expected_points).sum(),
            favorites: count(PickRole::Favorite),
            underdogs: count(PickRole::Underdog),
            pickems: count(PickRole::PickEm),
            picks,
        }
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

pub struct PointsPlusSelector {
    rules: PointsPlusRules,
}

impl PointsPlusSelector {
    pub fn new(rules: PointsPlusRules) -> Result<Self, SelectionError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &PointsPlusRules {
        &self.rules
    }

    /// Candidates the rules allow, one per game with a line
    pub fn candidates(&self, picks: &[CandidatePick]) -> Vec<PointsPlusCandidate> {
        picks
            .iter()
            .filter_map(|pick| {
                let candidate = PointsPlusCandidate::from_pick(pick);
                if candidate.is_none() {
                    debug!(game_id = %pick.game_id, "no line, skipped for points-plus");
                }
                candidate
            })
            .filter(|c| self.allows(c))
            .collect()
    }

    fn allows(&self, candidate: &PointsPlusCandidate) -> bool {
        self.rules.allow_pickem || candidate.role != PickRole::PickEm
    }

    /// Choose the best subset of a week's scored picks
    pub fn select(&self, picks: &[CandidatePick]) -> Result<PointsPlusSelection, SelectionError> {
        self.select_from(self.candidates(picks))
    }

    pub fn select_from(
        &self,
        candidates: Vec<PointsPlusCandidate>,
    ) -> Result<PointsPlusSelection, SelectionError> {
        let candidates: Vec<PointsPlusCandidate> =
            candidates.into_iter().filter(|c| self.allows(c)).collect();
        let available = candidates.len();
        if available < self.rules.min_games {
            warn!(
                required = self.rules.min_games,
                available, "not enough games for points-plus"
            );
            return Err(SelectionError::NotEnoughGames {
                required: self.rules.min_games,
                available,
            });
        }
        let max_games = self.rules.max_games.unwrap_or(available).min(available);

        let selection = if self.rules.balance_favorites {
            self.select_balanced(candidates, max_games)?
        } else {
            self.select_unbalanced(candidates, max_games)
        };

        info!(
            games = selection.len(),
            favorites = selection.favorites,
            underdogs = selection.underdogs,
            expected_points = selection.total_expected_points,
            "points-plus selection"
        );
        Ok(selection)
    }

    /// Every positive pick up to the cap, padded with the least negative
    /// ones when needed to reach the minimum
    fn select_unbalanced(
        &self,
        mut candidates: Vec<PointsPlusCandidate>,
        max_games: usize,
    ) -> PointsPlusSelection {
        candidates.sort_by(by_value);
        let positive = candidates.iter().filter(|c| c.expected_points > 0.0).count();
        let take = positive.clamp(self.rules.min_games, max_games);
        candidates.truncate(take);
        PointsPlusSelection::from_picks(candidates)
    }

    fn select_balanced(
        &self,
        candidates: Vec<PointsPlusCandidate>,
        max_games: usize,
    ) -> Result<PointsPlusSelection, SelectionError> {
        let mut favorites = Vec::new();
        let mut underdogs = Vec::new();
        let mut pickems = Vec::new();
        for candidate in candidates {
            match candidate.role {
                PickRole::Favorite => favorites.push(candidate),
                PickRole::Underdog => underdogs.push(candidate),
                PickRole::PickEm => pickems.push(candidate),
            }
        }
        favorites.sort_by(by_value);
        underdogs.sort_by(by_value);
        pickems.sort_by(by_value);

        let fav_sums = prefix_sums(&favorites);
        let dog_sums = prefix_sums(&underdogs);
        let pickem_sums = prefix_sums(&pickems);

        // (value, fewer games, more pairs) -> (pairs, pick'ems)
        let mut best: Option<((OrderedFloat<f64>, Reverse<usize>, usize), (usize, usize))> = None;
        for pairs in 0..=favorites.len().min(underdogs.len()) {
            for extra in 0..=pickems.len() {
                let games = 2 * pairs + extra;
                if games < self.rules.min_games || games > max_games {
                    continue;
                }
                let value = fav_sums[pairs] + dog_sums[pairs] + pickem_sums[extra];
                let key = (OrderedFloat(value), Reverse(games), pairs);
                if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
                    best = Some((key, (pairs, extra)));
                }
            }
        }

        let Some((_, (pairs, extra))) = best else {
            warn!(
                required = self.rules.min_games,
                favorites = favorites.len(),
                underdogs = underdogs.len(),
                pickems = pickems.len(),
                "points-plus rules cannot be balanced"
            );
            return Err(SelectionError::Unbalanceable {
                required: self.rules.min_games,
                favorites: favorites.len(),
                underdogs: underdogs.len(),
                pickems: pickems.len(),
            });
        };

        favorites.truncate(pairs);
        underdogs.truncate(pairs);
        pickems.truncate(extra);

        let mut chosen = favorites;
        chosen.extend(underdogs);
        chosen.extend(pickems);
        Ok(PointsPlusSelection::from_picks(chosen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(game_id: &str, role: PickRole, expected_points: f64) -> PointsPlusCandidate {
        let line = match role {
            PickRole::Favorite => -3.0,
            PickRole::Underdog => 3.0,
            PickRole::PickEm => 0.0,
        };
        PointsPlusCandidate {
            game_id: game_id.to_string(),
            team: TeamId::from(game_id),
            side: Side::Home,
            line,
            role,
            expected_points,
            cover_probability: 0.5,
        }
    }

    fn ids(selection: &PointsPlusSelection) -> Vec<&str> {
        selection.picks.iter().map(|p| p.game_id.as_str()).collect()
    }

    #[test]
    fn test_rules_validation() {
        assert!(PointsPlusSelector::new(PointsPlusRules::new(0)).is_err());
        let inverted = PointsPlusRules {
            max_games: Some(2),
            ..PointsPlusRules::new(3)
        };
        assert!(matches!(
            PointsPlusSelector::new(inverted),
            Err(SelectionError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_role_from_line() {
        assert_eq!(PickRole::from_line(-6.5), PickRole::Favorite);
        assert_eq!(PickRole::from_line(2.5), PickRole::Underdog);
        assert_eq!(PickRole::from_line(0.0), PickRole::PickEm);
    }

    #[test]
    fn test_unbalanced_takes_positive_picks() {
        let selector = PointsPlusSelector::new(PointsPlusRules::new(2)).unwrap();
        let selection = selector
            .select_from(vec![
                candidate("a", PickRole::Favorite, 3.0),
                candidate("b", PickRole::Underdog, 2.0),
                candidate("c", PickRole::Favorite, 1.0),
                candidate("d", PickRole::Underdog, -1.0),
            ])
            .unwrap();
        assert_eq!(ids(&selection), vec!["a", "b", "c"]);
        assert!((selection.total_expected_points - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_picks_only_to_reach_minimum() {
        let selector = PointsPlusSelector::new(PointsPlusRules::new(3)).unwrap();
        let selection = selector
            .select_from(vec![
                candidate("a", PickRole::Favorite, 3.0),
                candidate("b", PickRole::Underdog, -0.5),
                candidate("c", PickRole::Favorite, -2.0),
                candidate("d", PickRole::Underdog, -1.0),
            ])
            .unwrap();
        assert_eq!(ids(&selection), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_max_games_caps_selection() {
        let rules = PointsPlusRules {
            max_games: Some(2),
            ..PointsPlusRules::new(1)
        };
        let selector = PointsPlusSelector::new(rules).unwrap();
        let selection = selector
            .select_from(vec![
                candidate("a", PickRole::Favorite, 3.0),
                candidate("b", PickRole::Favorite, 2.0),
                candidate("c", PickRole::Favorite, 1.0),
            ])
            .unwrap();
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_balanced_forces_underdog() {
        let rules = PointsPlusRules {
            balance_favorites: true,
            ..PointsPlusRules::new(4)
        };
        let selector = PointsPlusSelector::new(rules).unwrap();
        let selection = selector
            .select_from(vec![
                candidate("f1", PickRole::Favorite, 5.0),
                candidate("f2", PickRole::Favorite, 4.5),
                candidate("f3", PickRole::Favorite, 4.0),
                candidate("u1", PickRole::Underdog, 3.5),
                candidate("u2", PickRole::Underdog, 0.5),
            ])
            .unwrap();

        assert_eq!(selection.favorites, 2);
        assert_eq!(selection.underdogs, 2);
        assert!(selection.picks.iter().any(|p| p.game_id == "u2"));
        assert!(!selection.picks.iter().any(|p| p.game_id == "f3"));
    }

    #[test]
    fn test_balanced_uses_pickems_for_odd_minimum() {
        let rules = PointsPlusRules {
            balance_favorites: true,
            allow_pickem: true,
            ..PointsPlusRules::new(3)
        };
        let selector = PointsPlusSelector::new(rules).unwrap();
        let selection = selector
            .select_from(vec![
                candidate("f1", PickRole::Favorite, 2.0),
                candidate("u1", PickRole::Underdog, 2.0),
                candidate("p1", PickRole::PickEm, 1.0),
            ])
            .unwrap();
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.pickems, 1);
    }

    #[test]
    fn test_balanced_infeasible_is_error() {
        let rules = PointsPlusRules {
            balance_favorites: true,
            ..PointsPlusRules::new(4)
        };
        let selector = PointsPlusSelector::new(rules).unwrap();
        let result = selector.select_from(vec![
            candidate("f1", PickRole::Favorite, 2.0),
            candidate("f2", PickRole::Favorite, 2.0),
            candidate("f3", PickRole::Favorite, 2.0),
            candidate("u1", PickRole::Underdog, 2.0),
        ]);
        assert_eq!(
            result,
            Err(SelectionError::Unbalanceable {
                required: 4,
                favorites: 3,
                underdogs: 1,
                pickems: 0
            })
        );
    }

    #[test]
    fn test_not_enough_games() {
        let selector = PointsPlusSelector::new(PointsPlusRules::new(3)).unwrap();
        let result = selector.select_from(vec![candidate("a", PickRole::Favorite, 1.0)]);
        assert_eq!(
            result,
            Err(SelectionError::NotEnoughGames {
                required: 3,
                available: 1
            })
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        let rules = PointsPlusRules {
            balance_favorites: true,
            ..PointsPlusRules::new(2)
        };
        let selector = PointsPlusSelector::new(rules).unwrap();
        let pool = vec![
            candidate("b", PickRole::Favorite, 1.0),
            candidate("a", PickRole::Favorite, 1.0),
            candidate("d", PickRole::Underdog, 1.0),
            candidate("c", PickRole::Underdog, 1.0),
        ];
        let mut reversed = pool.clone();
        reversed.reverse();

        let first = selector.select_from(pool).unwrap();
        let second = selector.select_from(reversed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pickem_excluded_unless_allowed() {
        let selector = PointsPlusSelector::new(PointsPlusRules::new(1)).unwrap();
        let pick = CandidatePick {
            game_id: "g".to_string(),
            home: TeamId::from("H"),
            away: TeamId::from("A"),
            market_probability: 0.55,
            elo_probability: 0.5,
            adjustments: Vec::new(),
            projected_margin: 2.0,
            spread: Some(0.0),
            home_confidence: 55.0,
            confidence: 55.0,
            recommended_side: Side::Home,
            label: crate::domain::ConfidenceLabel::Weak,
            news_applied: false,
            degraded: Vec::new(),
        };
        assert!(selector.candidates(std::slice::from_ref(&pick)).is_empty());

        let lenient = PointsPlusSelector::new(PointsPlusRules {
            allow_pickem: true,
            ..PointsPlusRules::new(1)
        })
        .unwrap();
        let candidates = lenient.candidates(&[pick]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].role, PickRole::PickEm);
        assert!((candidates[0].expected_points - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_from_drops_pickems_unless_allowed() {
        let pool = vec![
            candidate("p1", PickRole::PickEm, 4.0),
            candidate("a", PickRole::Favorite, 1.0),
        ];

        let strict = PointsPlusSelector::new(PointsPlusRules::new(1)).unwrap();
        let selection = strict.select_from(pool.clone()).unwrap();
        assert_eq!(ids(&selection), vec!["a"]);
        assert_eq!(selection.pickems, 0);

        let only_pickem = strict.select_from(vec![candidate("p1", PickRole::PickEm, 4.0)]);
        assert_eq!(
            only_pickem,
            Err(SelectionError::NotEnoughGames {
                required: 1,
                available: 0
            })
        );

        let lenient = PointsPlusSelector::new(PointsPlusRules {
            allow_pickem: true,
            ..PointsPlusRules::new(1)
        })
        .unwrap();
        let selection = lenient.select_from(pool).unwrap();
        assert_eq!(ids(&selection), vec!["p1", "a"]);
    }
}
