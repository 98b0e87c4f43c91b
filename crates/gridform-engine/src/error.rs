//! Error types for the formula engine.

use thiserror::Error;

/// Errors raised while resolving or evaluating a formula.
///
/// Every variant is produced before the grid is touched, except where a
/// mutation-style function documents partial progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Malformed cell coordinate: '{0}'")]
    MalformedCoordinate(String),

    #[error("Malformed cell range: '{0}'")]
    MalformedRange(String),

    #[error("Unrecognized formula: '{0}'")]
    UnrecognizedFormula(String),

    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("AVERAGE over empty range {0}")]
    DivisionByEmptyRange(String),

    #[error("{function} over empty range {range}")]
    EmptyRangeForExtremum {
        function: &'static str,
        range: String,
    },

    #[error("Range {range} has {cells} cells (limit {limit})")]
    RangeTooLarge {
        range: String,
        cells: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
