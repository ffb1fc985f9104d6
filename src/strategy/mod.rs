//! Pool-format strategies built on top of scored picks.

pub mod points_plus;
pub mod ranking;

pub use points_plus::{
    PickRole, PointsPlusCandidate, PointsPlusRules, PointsPlusSelection, PointsPlusSelector,
};
pub use ranking::{cover_projection, rank_picks, CoverProjection, PoolFormat, RankedPick};
