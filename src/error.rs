//! Centralized error types for the simulation core.
//!
//! Everything fallible in the library returns [`GameResult`]; the binary wraps these in `anyhow`.

use std::io;

use crate::item::PowerItem;

/// Main error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A power item reached an entity of the wrong category.
    ///
    /// This is a wiring or level-data bug, so it is reported on every occurrence rather than ignored.
    #[error("{item} cannot be applied to a {recipient}")]
    MisroutedPowerItem { item: PowerItem, recipient: Recipient },

    #[error("Invalid decorator composition: {0}")]
    InvalidComposition(String),

    #[error("Invalid placement: {0}")]
    Placement(String),

    #[error("Malformed score log line {line}: {reason}")]
    ScoreLog { line: usize, reason: String },

    #[error("Timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The kind of entity a power item was dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Recipient {
    Ghost,
    Player,
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive 32-bit ratio, got {value}")]
    InvalidRatio { name: &'static str, value: i64 },

    #[error("{name} must be at most {max}, got {value}")]
    RatioTooLarge { name: &'static str, value: i64, max: i64 },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
