use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, Matchup, Side};

/// Divisional games play closer than the line: shade toward the underdog
pub fn divisional(weights: &WeightConfig, matchup: &Matchup, favorite: Option<Side>) -> Adjustment {
    match (matchup.divisional, favorite) {
        (true, Some(favorite)) => Adjustment::new(
            Factor::Divisional,
            -favorite.sign() * weights.divisional_weight,
        )
        .with_detail(format!("divisional, {} underdog", favorite.opposite())),
        _ => Adjustment::none(Factor::Divisional),
    }
}

/// Small edge for the side that lost the previous meeting
pub fn revenge(weights: &WeightConfig, matchup: &Matchup) -> Adjustment {
    match matchup.revenge {
        Some(side) => Adjustment::new(Factor::Revenge, side.sign() * weights.revenge_weight)
            .with_detail(format!("{side} seeking revenge")),
        None => Adjustment::none(Factor::Revenge),
    }
}
