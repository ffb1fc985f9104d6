use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, Venue};

/// Fixed home-field edge; nothing at a neutral site
pub fn home_field(weights: &WeightConfig, venue: &Venue) -> Adjustment {
    if venue.neutral_site {
        return Adjustment::none(Factor::HomeField).with_detail("neutral site");
    }
    Adjustment::new(Factor::HomeField, weights.home_advantage.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_field_favors_home() {
        let weights = WeightConfig::default();
        let adj = home_field(&weights, &Venue::outdoor("Arrowhead"));
        assert_eq!(adj.points, weights.home_advantage);
        assert!(adj.points > 0.0);
    }

    #[test]
    fn test_neutral_site_has_no_home_field() {
        let adj = home_field(&WeightConfig::default(), &Venue::neutral("Wembley"));
        assert!(adj.is_neutral());
    }
}
