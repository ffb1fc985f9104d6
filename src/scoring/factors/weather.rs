use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, Input, Side, Sides, Venue, WeatherObservation};

/// Wind (mph over threshold) that counts as full severity
const WIND_SEVERITY_SPAN_MPH: f64 = 10.0;

/// Combined wind + precipitation severity ceiling
const MAX_SEVERITY: f64 = 2.0;

/// How bad conditions are, from 0 (irrelevant) to 2
pub fn weather_severity(weights: &WeightConfig, obs: &WeatherObservation) -> f64 {
    let wind = ((obs.wind_mph - weights.wind_threshold_mph).max(0.0) / WIND_SEVERITY_SPAN_MPH)
        .min(1.0);

    let threshold = weights.precipitation_threshold;
    let precipitation = if threshold < 1.0 && obs.precipitation_probability > threshold {
        ((obs.precipitation_probability - threshold) / (1.0 - threshold)).min(1.0)
    } else {
        0.0
    };

    let severity = wind + precipitation;
    if severity.is_finite() {
        severity.min(MAX_SEVERITY)
    } else {
        0.0
    }
}

/// Side hurt more by bad weather: the more pass-reliant team, else the favorite
fn exposed_side(pass_reliance: &Sides<Input<f64>>, favorite: Option<Side>) -> Option<Side> {
    if let (Input::Known(home), Input::Known(away)) = (pass_reliance.home, pass_reliance.away) {
        if home > away {
            return Some(Side::Home);
        }
        if away > home {
            return Some(Side::Away);
        }
    }
    favorite
}

/// Weather penalty in points against the exposed side.
///
/// Domes and missing observations contribute nothing.
pub fn weather(
    weights: &WeightConfig,
    venue: &Venue,
    observation: Input<&WeatherObservation>,
    pass_reliance: &Sides<Input<f64>>,
    favorite: Option<Side>,
) -> Adjustment {
    if venue.dome {
        return Adjustment::none(Factor::Weather).with_detail("dome");
    }
    let obs = match observation {
        Input::Known(obs) => obs,
        Input::Missing => {
            return Adjustment::none(Factor::Weather).with_detail("no observation");
        }
    };

    let severity = weather_severity(weights, obs);
    if severity == 0.0 {
        return Adjustment::none(Factor::Weather);
    }

    match exposed_side(pass_reliance, favorite) {
        Some(side) => Adjustment::new(
            Factor::Weather,
            -side.sign() * severity * weights.weather_penalty_weight,
        )
        .with_detail(format!(
            "wind {:.0}mph, precip {:.0}%, penalizes {side}",
            obs.wind_mph,
            obs.precipitation_probability * 100.0
        )),
        None => Adjustment::none(Factor::Weather).with_detail("no exposed side"),
    }
}
