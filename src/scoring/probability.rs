//! Probability conversions shared by every scoring component
//!
//! Moneylines become implied probabilities here, and probabilities move
//! to and from the point-spread scale here. Nothing else in the crate
//! converts odds on its own.

use serde::{Deserialize, Serialize};

use crate::domain::Input;

/// Neutral probability for any missing input
pub const PICK_EM_PROBABILITY: f64 = 0.5;

/// Lower clamp for every probability the engine emits
pub const MIN_PROBABILITY: f64 = 0.01;

/// Upper clamp for every probability the engine emits
pub const MAX_PROBABILITY: f64 = 0.99;

/// Elo rating points equivalent to one point of spread
pub const ELO_POINTS_PER_SPREAD_POINT: f64 = 25.0;

/// Spread points per 10x change in odds (400 Elo / 25)
const SPREAD_POINTS_PER_DECADE: f64 = 400.0 / ELO_POINTS_PER_SPREAD_POINT;

/// Clamp into [MIN_PROBABILITY, MAX_PROBABILITY]; non-finite values become pick'em
pub fn clamp_probability(p: f64) -> f64 {
    if !p.is_finite() {
        return PICK_EM_PROBABILITY;
    }
    p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Same bounds as [`clamp_probability`] on the 0-100 confidence scale
pub fn clamp_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return PICK_EM_PROBABILITY * 100.0;
    }
    confidence.clamp(MIN_PROBABILITY * 100.0, MAX_PROBABILITY * 100.0)
}

/// The single place a missing probability turns into 0.5
pub fn resolve_probability(input: Input<f64>) -> f64 {
    match input {
        Input::Known(p) => clamp_probability(p),
        Input::Missing => PICK_EM_PROBABILITY,
    }
}

/// Implied probability before clamping; `None` for a zero price
fn raw_implied_probability(price: i32) -> Option<f64> {
    let m = price as f64;
    if price < 0 {
        Some(m.abs() / (m.abs() + 100.0))
    } else if price > 0 {
        Some(100.0 / (m + 100.0))
    } else {
        None
    }
}

/// Convert an American moneyline to an implied win probability.
///
/// - `-150` ⇒ 150 / 250 = 0.60
/// - `+130` ⇒ 100 / 230 ≈ 0.435
/// - missing (or a zero price, which is not a valid quote) ⇒ 0.5
///
/// Output is always within [0.01, 0.99].
pub fn moneyline_to_probability(price: Input<i32>) -> f64 {
    let implied = price.known().and_then(raw_implied_probability);
    resolve_probability(implied.into())
}

/// Convert a probability back to an American price (for display)
pub fn probability_to_moneyline(p: f64) -> i32 {
    let p = clamp_probability(p);
    if p >= 0.5 {
        -((p / (1.0 - p)) * 100.0).round() as i32
    } else {
        (((1.0 - p) / p) * 100.0).round() as i32
    }
}

/// Home win probability implied by a pair of moneylines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketProbability {
    pub home: f64,
    /// Neither price was available
    pub degraded: bool,
}

impl MarketProbability {
    pub fn away(&self) -> f64 {
        1.0 - self.home
    }
}

/// Home win probability with the bookmaker margin removed.
///
/// Both prices known: the implied pair is normalized to sum to 1.
/// One price known: that side's implied probability is used alone.
/// Neither: pick'em, flagged as degraded.
pub fn no_vig_home_probability(home: Input<i32>, away: Input<i32>) -> MarketProbability {
    let home_raw = home.known().and_then(raw_implied_probability);
    let away_raw = away.known().and_then(raw_implied_probability);

    let (p, degraded) = match (home_raw, away_raw) {
        (Some(h), Some(a)) => (h / (h + a), false),
        (Some(h), None) => (h, false),
        (None, Some(a)) => (1.0 - a, false),
        (None, None) => (PICK_EM_PROBABILITY, true),
    };

    MarketProbability {
        home: clamp_probability(p),
        degraded,
    }
}

/// Probability that a side expected to win by `points` actually wins
pub fn spread_to_probability(points: f64) -> f64 {
    if !points.is_finite() {
        return PICK_EM_PROBABILITY;
    }
    clamp_probability(1.0 / (1.0 + 10f64.powf(-points / SPREAD_POINTS_PER_DECADE)))
}

/// Expected margin in points for a given win probability
pub fn probability_to_spread(p: f64) -> f64 {
    let p = clamp_probability(p);
    SPREAD_POINTS_PER_DECADE * (p / (1.0 - p)).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_moneyline() {
        let p = moneyline_to_probability(Input::Known(-150));
        assert!((p - 0.6).abs() < 1e-12, "p={p}");
    }

    #[test]
    fn test_positive_moneyline() {
        let p = moneyline_to_probability(Input::Known(130));
        assert!((p - 100.0 / 230.0).abs() < 1e-12, "p={p}");
    }

    #[test]
    fn test_missing_moneyline_is_exactly_half() {
        assert_eq!(moneyline_to_probability(Input::Missing), 0.5);
        assert_eq!(moneyline_to_probability(Input::Known(0)), 0.5);
    }

    #[test]
    fn test_extreme_prices_are_clamped() {
        assert_eq!(moneyline_to_probability(Input::Known(-100_000)), MAX_PROBABILITY);
        assert_eq!(moneyline_to_probability(Input::Known(100_000)), MIN_PROBABILITY);
    }

    #[test]
    fn test_probability_always_inside_open_interval() {
        for m in (-5000..=5000).step_by(37).filter(|m| *m != 0) {
            let p = moneyline_to_probability(Input::Known(m));
            assert!(p > 0.0 && p < 1.0, "m={m} p={p}");
        }
    }

    #[test]
    fn test_mirrored_prices_sum_to_one() {
        for m in [100, 110, 150, 240, 500, 1200] {
            let fav = moneyline_to_probability(Input::Known(-m));
            let dog = moneyline_to_probability(Input::Known(m));
            assert!((fav + dog - 1.0).abs() < 1e-9, "m={m}: {fav} + {dog}");
        }
    }

    #[test]
    fn test_unequal_prices_do_not_mirror() {
        let fav = moneyline_to_probability(Input::Known(-150));
        let dog = moneyline_to_probability(Input::Known(130));
        assert!((fav + dog - 1.0).abs() > 0.01, "vig should show in the raw pair");
    }

    #[test]
    fn test_no_vig_normalizes_pair() {
        let market = no_vig_home_probability(Input::Known(-150), Input::Known(130));
        let expected = 0.6 / (0.6 + 100.0 / 230.0);
        assert!((market.home - expected).abs() < 1e-12);
        assert!(!market.degraded);
        assert!((market.home + market.away() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_vig_single_side_and_missing() {
        let home_only = no_vig_home_probability(Input::Known(-150), Input::Missing);
        assert!((home_only.home - 0.6).abs() < 1e-12);

        let away_only = no_vig_home_probability(Input::Missing, Input::Known(-150));
        assert!((away_only.home - 0.4).abs() < 1e-12);

        let neither = no_vig_home_probability(Input::Missing, Input::Missing);
        assert_eq!(neither.home, 0.5);
        assert!(neither.degraded);
    }

    #[test]
    fn test_spread_round_trip_and_scale() {
        assert_eq!(spread_to_probability(0.0), 0.5);
        assert!((probability_to_spread(0.5)).abs() < 1e-12);

        // A 3-point favorite wins a bit over 60% of the time on this scale
        let p = spread_to_probability(3.0);
        assert!(p > 0.59 && p < 0.62, "p={p}");

        let back = probability_to_spread(p);
        assert!((back - 3.0).abs() < 1e-9, "back={back}");
    }

    #[test]
    fn test_probability_to_moneyline() {
        assert_eq!(probability_to_moneyline(0.6), -150);
        assert_eq!(probability_to_moneyline(0.4), 150);
        assert_eq!(probability_to_moneyline(0.5), -100);
    }
}
