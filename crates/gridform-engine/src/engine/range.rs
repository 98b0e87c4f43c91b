//! Rectangular cell ranges (`A1:B3`) and their expansion into cells.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::{CellCoord, parse_coordinate};
use super::grid::GridProvider;
use crate::error::{EngineError, Result};

/// An inclusive rectangle of cells.
///
/// Bounds are not normalised: a range whose start lies after its end in
/// either dimension is empty rather than invalid.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    pub fn new(start: CellCoord, end: CellCoord) -> CellRange {
        CellRange {
            start_row: start.row,
            start_col: start.col,
            end_row: end.row,
            end_col: end.col,
        }
    }

    pub fn single(cell: CellCoord) -> CellRange {
        CellRange::new(cell, cell)
    }

    pub fn start(&self) -> CellCoord {
        CellCoord::new(self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellCoord {
        CellCoord::new(self.end_row, self.end_col)
    }

    pub fn is_empty(&self) -> bool {
        self.start_row > self.end_row || self.start_col > self.end_col
    }

    /// Number of cells covered (saturating), zero for an empty range.
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let rows = self.end_row - self.start_row + 1;
        let cols = self.end_col - self.start_col + 1;
        rows.saturating_mul(cols)
    }

    /// Every coordinate in the range, row-major.
    pub fn expand(&self) -> Vec<CellCoord> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let cols = self.start_col..=self.end_col;
        (self.start_row..=self.end_row)
            .flat_map(move |row| cols.clone().map(move |col| CellCoord::new(row, col)))
    }

    /// Texts of one row across the range's columns.
    pub fn row_texts<G: GridProvider + ?Sized>(&self, grid: &G, row: usize) -> Vec<String> {
        (self.start_col..=self.end_col)
            .map(|col| grid.read_text(&CellCoord::new(row, col)))
            .collect()
    }
}

/// Parse `A1:B3`, or a single label `A1` as a one-cell range.
pub fn parse_range(label: &str) -> Result<CellRange> {
    let malformed = |_| EngineError::MalformedRange(label.to_string());

    let mut parts = label.split(':');
    let start = parts.next().unwrap_or_default();
    let end = parts.next();
    if parts.next().is_some() {
        return Err(EngineError::MalformedRange(label.to_string()));
    }

    let start = parse_coordinate(start).map_err(malformed)?;
    let end = match end {
        Some(end) => parse_coordinate(end).map_err(malformed)?,
        None => start,
    };
    Ok(CellRange::new(start, end))
}

/// Numeric values of every cell in the range, row-major.
pub fn values<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> Vec<f64> {
    range.iter().map(|coord| grid.read_numeric(&coord)).collect()
}

impl std::str::FromStr for CellRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_range(s)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}
