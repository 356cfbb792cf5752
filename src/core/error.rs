//! Error types.
//!
//! Every error here is raised before a playout starts or at the live-play
//! boundary. A validated playout never fails; a runaway game is a
//! [`LossReason`](crate::playout::LossReason), not an error.

use thiserror::Error;

/// Malformed level input.
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("level has no cards")]
    EmptyBoard,
    #[error("duplicate card id `{0}`")]
    DuplicateId(String),
    #[error("card #{0} has an empty id")]
    EmptyId(usize),
    #[error("card `{id}`: fixed value {value} is outside 1..=13")]
    InvalidValue { id: String, value: i64 },
    #[error("card `{0}`: non-random value card is missing its value")]
    MissingValue(String),
    #[error("card `{id}`: position ({x}, {y}) is not finite")]
    InvalidPosition { id: String, x: f32, y: f32 },
    #[error("card `{id}`: bomb countdown {countdown} must be positive")]
    InvalidBomb { id: String, countdown: i32 },
    #[error("draw pile entry {index}: fixed value {value} is outside 1..=13")]
    InvalidDrawEntry { index: usize, value: i64 },
    #[error("unsupported win condition `{0}`")]
    UnsupportedWinCondition(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Out-of-range configuration parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("{name} = {value} must be finite and positive")]
    NonPositive { name: &'static str, value: f64 },
    #[error("deck size range {min}..={max} is empty")]
    EmptyRange { min: usize, max: usize },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("max_turns = {max_turns} does not exceed the longest legal game ({longest} moves)")]
    TurnCapTooLow { max_turns: u32, longest: usize },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Illegal action submitted to a live playout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("game is already over")]
    GameOver,
    #[error("card index {0} is out of range")]
    UnknownCard(usize),
    #[error("card `{0}` is not playable")]
    NotPlayable(String),
    #[error("draw pile is exhausted")]
    DrawPileEmpty,
}

/// Umbrella error for the tuner and export paths.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
