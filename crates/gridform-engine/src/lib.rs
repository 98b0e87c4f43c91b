//! gridform_engine - Formula evaluation over an abstract cell grid.

pub mod builtins;
pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
