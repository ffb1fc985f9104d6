use chrono::{DateTime, Utc};

use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, Input, Sides};

/// Whole days between two kickoffs (0 if out of order)
pub fn rest_days_between(previous_kickoff: DateTime<Utc>, kickoff: DateTime<Utc>) -> u32 {
    (kickoff - previous_kickoff).num_days().max(0) as u32
}

/// Rest differential in points.
///
/// The day gap is capped at `rest_cap_days` so a bye week does not swamp
/// the other factors. Either side missing means no adjustment.
pub fn rest(weights: &WeightConfig, rest_days: &Sides<Input<u32>>) -> Adjustment {
    let (home, away) = match (rest_days.home, rest_days.away) {
        (Input::Known(home), Input::Known(away)) => (home, away),
        _ => return Adjustment::none(Factor::Rest).with_detail("rest days unavailable"),
    };

    let cap = weights.rest_cap_days.max(0.0);
    let gap = (home as f64 - away as f64).clamp(-cap, cap);
    Adjustment::new(Factor::Rest, gap * weights.rest_weight)
        .with_detail(format!("home {home}d / away {away}d"))
}
