use thiserror::Error;

/// Main error type for the pick engine
#[derive(Error, Debug)]
pub enum PickemError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unknown weight profile: {0}")]
    UnknownProfile(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Business rule errors
    #[error("Rule violation: {0}")]
    RuleViolation(#[from] RuleViolation),

    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PickemError
pub type Result<T> = std::result::Result<T, PickemError>;

/// Survivor invariants the engine refuses to work around
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("entry {entry_id} was eliminated in week {week}")]
    EntryEliminated { entry_id: String, week: u32 },

    #[error("entry {entry_id} already used team {team}")]
    TeamAlreadyUsed { entry_id: String, team: String },
}

/// Points-Plus selections that cannot satisfy the pool rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("not enough eligible games: required {required}, available {available}")]
    NotEnoughGames { required: usize, available: usize },

    #[error(
        "cannot balance favorites and underdogs: required {required} games, \
         favorites {favorites}, underdogs {underdogs}, pick'ems {pickems}"
    )]
    Unbalanceable {
        required: usize,
        favorites: usize,
        underdogs: usize,
        pickems: usize,
    },

    #[error("invalid rules: {0}")]
    InvalidRules(String),
}
