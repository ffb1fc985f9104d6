//! Survivor pool engine: per-team expected value and batch diversification.

pub mod cache;
pub mod diversify;
pub mod ev;

pub use cache::{EvCache, EvKey};
pub use diversify::{
    Assignment, DiversificationPlan, DiversificationStrategy, Diversifier, EntryPlan, PickTier,
    UnresolvedReason,
};
pub use ev::SurvivorEvEngine;
