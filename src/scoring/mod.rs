//! Pick scoring: odds conversion, Elo, situational factors and the
//! weighted confidence calculator that combines them.

pub mod confidence;
pub mod elo;
pub mod factors;
pub mod probability;

pub use confidence::{ConfidenceCalculator, ConfidenceScore};
pub use elo::{DatedRating, EloModel, GameOutcome, RatingSnapshot, RatingUpdate, DEFAULT_RATING};
pub use factors::{situational_adjustments, SituationalReport};
pub use probability::{
    clamp_confidence, clamp_probability, moneyline_to_probability, no_vig_home_probability,
    probability_to_moneyline, probability_to_spread, resolve_probability, spread_to_probability,
    MarketProbability, PICK_EM_PROBABILITY,
};
