//! Error types for Gridform core.

use thiserror::Error;

use gridform_engine::EngineError;

/// Errors that can occur while editing, loading or saving a document
#[derive(Error, Debug)]
pub enum GridformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("No file path set")]
    NoFilePath,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, GridformError>;
