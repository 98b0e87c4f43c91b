//! Grid access for the engine.
//!
//! The engine never owns cells. It reads and writes them through
//! [`GridProvider`], which the host implements over whatever storage backs
//! its sheet. [`SheetGrid`] is the in-memory provider used by the document
//! layer and in tests:
//!
//! - sparse cell storage backed by `DashMap`
//! - explicit row/column extents, grown by writes and `add_row`/`add_column`
//! - `delete_row` shifts every later row up by one

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::cell_ref::{CellCoord, MAX_COLUMNS};

/// Current size of a grid (number of rows and columns, 1-based extents).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridExtent {
    pub rows: usize,
    pub cols: usize,
}

/// Boundary contract between the engine and the host's sheet.
///
/// Coordinates are 1-based.
pub trait GridProvider {
    /// Current text of a cell; empty if the cell was never written.
    fn read_text(&self, coord: &CellCoord) -> String;

    /// Overwrite the text of a cell.
    fn write_text(&mut self, coord: &CellCoord, text: &str);

    /// Remove a row, shifting every row below it up by one.
    fn delete_row(&mut self, row: usize);

    fn extent(&self) -> GridExtent;

    /// Numeric value of a cell. Text that does not parse reads as zero.
    fn read_numeric(&self, coord: &CellCoord) -> f64 {
        parse_number(&self.read_text(coord)).unwrap_or(0.0)
    }
}

/// Parse cell text as a finite number after trimming surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// In-memory sparse grid.
#[derive(Clone, Debug, Default)]
pub struct SheetGrid {
    cells: DashMap<CellCoord, String>,
    extent: GridExtent,
}

impl SheetGrid {
    pub fn new(rows: usize, cols: usize) -> SheetGrid {
        SheetGrid {
            cells: DashMap::new(),
            extent: GridExtent {
                rows,
                cols: cols.min(MAX_COLUMNS),
            },
        }
    }

    /// Append an empty row at the bottom of the grid.
    pub fn add_row(&mut self) {
        self.extent.rows += 1;
    }

    /// Append an empty column. Returns false once the grid already spans `A`..=`Z`.
    pub fn add_column(&mut self) -> bool {
        if self.extent.cols >= MAX_COLUMNS {
            return false;
        }
        self.extent.cols += 1;
        true
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All non-empty cells in row-major order.
    pub fn populated(&self) -> Vec<(CellCoord, String)> {
        let mut cells: Vec<(CellCoord, String)> = self
            .cells
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        cells.sort_by_key(|(coord, _)| *coord);
        cells
    }

    /// Bounds of the populated cells as `(min, max)`, or `None` for an empty grid.
    pub fn populated_bounds(&self) -> Option<(CellCoord, CellCoord)> {
        let mut bounds: Option<(CellCoord, CellCoord)> = None;
        for entry in self.cells.iter() {
            let coord = *entry.key();
            bounds = Some(match bounds {
                None => (coord, coord),
                Some((min, max)) => (
                    CellCoord::new(min.row.min(coord.row), min.col.min(coord.col)),
                    CellCoord::new(max.row.max(coord.row), max.col.max(coord.col)),
                ),
            });
        }
        bounds
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl GridProvider for SheetGrid {
    fn read_text(&self, coord: &CellCoord) -> String {
        self.cells
            .get(coord)
            .map(|text| text.value().clone())
            .unwrap_or_default()
    }

    fn write_text(&mut self, coord: &CellCoord, text: &str) {
        if text.is_empty() {
            self.cells.remove(coord);
            return;
        }
        self.extent.rows = self.extent.rows.max(coord.row);
        self.extent.cols = self.extent.cols.max(coord.col);
        self.cells.insert(*coord, text.to_string());
    }

    fn delete_row(&mut self, row: usize) {
        if row == 0 || row > self.extent.rows {
            return;
        }
        log::trace!("deleting row {}", row);

        // Collect cells in and below the deleted row
        let affected: Vec<(CellCoord, String)> = self
            .cells
            .iter()
            .filter(|entry| entry.key().row >= row)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (coord, _) in &affected {
            self.cells.remove(coord);
        }

        // Reinsert the cells that were below with row - 1
        for (coord, text) in affected {
            if coord.row > row {
                self.cells.insert(CellCoord::new(coord.row - 1, coord.col), text);
            }
        }

        self.extent.rows -= 1;
    }

    fn extent(&self) -> GridExtent {
        self.extent
    }
}
