pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod providers;
pub mod scoring;
pub mod strategy;
pub mod survivor;

pub use config::AppConfig;
pub use domain::{
    CandidatePick, EntrySnapshot, GameInputs, Input, PoolSnapshot, ScoringRun, Side,
    SurvivorPick, TeamId, TeamWeekOption,
};
pub use error::{PickemError, Result, RuleViolation, SelectionError};
pub use providers::{gather, gather_slate, ProviderContext, ScheduledGame};
pub use scoring::{ConfidenceCalculator, EloModel, RatingSnapshot};
pub use strategy::{rank_picks, PointsPlusRules, PointsPlusSelector, PoolFormat};
pub use survivor::{
    DiversificationPlan, DiversificationStrategy, Diversifier, EvCache, SurvivorEvEngine,
};
