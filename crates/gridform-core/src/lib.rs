//! gridform-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{DEFAULT_COLS, DEFAULT_ROWS, Document};
pub use error::{GridformError, Result};

pub use gridform_engine::engine::{CellCoord, Evaluation};
