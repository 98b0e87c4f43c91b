//! Formula engine API.
//!
//! - [`CellCoord`], [`parse_coordinate`] - A1 labels to 1-based (row, column)
//! - [`GridProvider`], [`SheetGrid`] - Grid access contract and in-memory grid
//! - [`CellRange`], [`parse_range`], [`values`] - Ranges and their expansion
//! - [`parse_formula`] - Function-call recognition
//! - [`Formula`] - Typed, validated formula
//! - [`Evaluator`], [`evaluate`] - Dispatch and result handling
//! - [`format_value`] - Stringify results for cells

mod cell_ref;
mod eval;
mod format;
mod formula;
mod grid;
mod parser;
mod range;

pub use cell_ref::{CellCoord, MAX_COLUMNS, parse_coordinate};
pub use eval::{DEFAULT_MAX_RANGE_CELLS, EvalOptions, Evaluation, Evaluator, evaluate};
pub use format::{Value, format_number, format_value};
pub use formula::Formula;
pub use grid::{GridExtent, GridProvider, SheetGrid, parse_number};
pub use parser::{FormulaInvocation, parse_formula};
pub use range::{CellRange, parse_range, values};
