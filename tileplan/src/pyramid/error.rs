//! Pyramid and plan construction errors.

use crate::grid::GridError;
use thiserror::Error;

/// Invalid pyramid structure.
#[derive(Debug, Error, PartialEq)]
pub enum PyramidError {
    #[error("pyramid has no levels")]
    NoLevels,

    #[error("level {level} has scale {current}, not greater than the previous level's {previous}")]
    ScalesNotAscending {
        level: usize,
        previous: f32,
        current: f32,
    },

    #[error("no level has the reference scale factor 1.0")]
    MissingReferenceLevel,

    #[error("level {level} out of range for a pyramid of {count} levels")]
    LevelOutOfRange { level: usize, count: usize },
}

/// Errors building a pyramid from a plan description.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Failed to read plan file
    #[error("Failed to read plan file: {0}")]
    ReadError(#[from] ini::Error),

    /// Plan text is not valid INI
    #[error("Failed to parse plan: {0}")]
    ParseError(#[from] ini::ParseError),

    #[error("plan has no levels")]
    NoLevels,

    #[error("missing required key {section}.{key}")]
    MissingKey { section: String, key: String },

    /// Invalid plan value
    #[error("Invalid plan value: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("{sources} per-level sources given for {levels} levels")]
    SourceCountMismatch { levels: usize, sources: usize },

    #[error("level {level} is invalid: {source}")]
    Grid { level: usize, source: GridError },

    #[error(transparent)]
    Pyramid(#[from] PyramidError),
}
