//! Document state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use state::{DEFAULT_COLS, DEFAULT_ROWS, Document};
