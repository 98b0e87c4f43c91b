use super::Document;
use crate::error::{GridformError, Result};
use gridform_engine::engine::{CellCoord, Evaluation, GridProvider, MAX_COLUMNS, SheetGrid};

impl Document {
    /// Push a snapshot of the grid before modifying it
    fn push_undo(&mut self) {
        self.push_undo_snapshot(self.grid.clone());
    }

    fn push_undo_snapshot(&mut self, snapshot: SheetGrid) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > super::state::MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }

    /// Current text of a cell.
    pub fn cell_text(&self, coord: &CellCoord) -> String {
        self.grid.read_text(coord)
    }

    /// Set cell text verbatim (no formula evaluation).
    pub fn set_cell(&mut self, coord: &CellCoord, text: &str) {
        if self.grid.read_text(coord) == text {
            return;
        }
        self.push_undo();
        self.grid.write_text(coord, text);
        self.modified = true;
    }

    /// Clear the specified cell
    pub fn clear_cell(&mut self, coord: &CellCoord) {
        self.set_cell(coord, "");
    }

    /// Append a row at the bottom of the sheet
    pub fn add_row(&mut self) {
        self.push_undo();
        self.grid.add_row();
        self.modified = true;
    }

    /// Append a column; returns false once the sheet reaches column Z
    pub fn add_column(&mut self) -> bool {
        if self.grid.extent().cols >= MAX_COLUMNS {
            return false;
        }
        self.push_undo();
        self.modified = true;
        self.grid.add_column()
    }

    /// Delete the specified row, shifting later rows up
    pub fn delete_row(&mut self, row: usize) {
        if row == 0 || row > self.grid.extent().rows {
            return;
        }
        self.push_undo();
        self.grid.delete_row(row);
        self.modified = true;
    }

    /// Submit formula text against a target cell.
    ///
    /// The grid is snapshotted first so the whole formula (including a
    /// multi-row REMOVE_DUPLICATES) undoes as one step. Ignored formulas and
    /// formulas that changed nothing leave no undo entry.
    pub fn apply_formula(&mut self, target: &CellCoord, formula_text: &str) -> Result<Evaluation> {
        let snapshot = self.grid.clone();
        let evaluation = self
            .evaluator
            .evaluate(&mut self.grid, formula_text, target)?;

        if evaluation.is_mutation() {
            self.push_undo_snapshot(snapshot);
            self.modified = true;
        }
        Ok(evaluation)
    }

    /// Undo the last change
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.undo_stack.pop().ok_or(GridformError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.grid, previous);
        self.redo_stack.push(current);
        self.modified = true;
        Ok(())
    }

    /// Redo the last undone change
    pub fn redo(&mut self) -> Result<()> {
        let next = self.redo_stack.pop().ok_or(GridformError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.grid, next);
        self.undo_stack.push(current);
        self.modified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridform_engine::EngineError;
    use pretty_assertions::assert_eq;

    fn c(label: &str) -> CellCoord {
        label.parse().unwrap()
    }

    fn doc_with_rows(rows: &[[&str; 2]]) -> Document {
        let mut doc = Document::new();
        for (r, row) in rows.iter().enumerate() {
            for (col, text) in row.iter().enumerate() {
                doc.grid.write_text(&CellCoord::new(r + 1, col + 1), text);
            }
        }
        doc
    }

    #[test]
    fn test_new_document_has_default_extent() {
        let doc = Document::new();
        assert_eq!(doc.grid.extent().rows, 20);
        assert_eq!(doc.grid.extent().cols, 10);
        assert!(!doc.modified);
    }

    #[test]
    fn test_apply_formula_writes_target_and_marks_modified() {
        let mut doc = doc_with_rows(&[["2", ""], ["3", ""]]);
        let result = doc.apply_formula(&c("A3"), "SUM(A1:A2)").unwrap();
        assert!(matches!(result, Evaluation::Scalar(_)));
        assert_eq!(doc.cell_text(&c("A3")), "5");
        assert!(doc.modified);
        assert_eq!(doc.undo_stack.len(), 1);
    }

    #[test]
    fn test_ignored_formula_leaves_no_trace() {
        let mut doc = doc_with_rows(&[["2", ""]]);
        let result = doc.apply_formula(&c("A3"), "not a formula").unwrap();
        assert_eq!(result, Evaluation::Ignored);
        assert!(!doc.modified);
        assert!(doc.undo_stack.is_empty());
    }

    #[test]
    fn test_failed_formula_leaves_grid_and_history_untouched() {
        let mut doc = doc_with_rows(&[["2", ""]]);
        let err = doc.apply_formula(&c("B1"), "MAX(A2:A1)").unwrap_err();
        assert!(matches!(
            err,
            GridformError::Engine(EngineError::EmptyRangeForExtremum { .. })
        ));
        assert_eq!(doc.cell_text(&c("B1")), "");
        assert!(doc.undo_stack.is_empty());
    }

    #[test]
    fn test_undo_restores_rows_removed_by_dedupe() {
        let mut doc = doc_with_rows(&[["x", "1"], ["x", "1"], ["y", "2"]]);
        doc.apply_formula(&c("C1"), "REMOVE_DUPLICATES(A1:B3)").unwrap();
        assert_eq!(doc.cell_text(&c("A2")), "y");
        assert_eq!(doc.grid.extent().rows, 19);

        doc.undo().unwrap();
        assert_eq!(doc.cell_text(&c("A2")), "x");
        assert_eq!(doc.cell_text(&c("A3")), "y");
        assert_eq!(doc.grid.extent().rows, 20);

        doc.redo().unwrap();
        assert_eq!(doc.cell_text(&c("A2")), "y");
    }

    #[test]
    fn test_undo_and_redo_on_empty_history() {
        let mut doc = Document::new();
        assert!(matches!(doc.undo(), Err(GridformError::NothingToUndo)));
        assert!(matches!(doc.redo(), Err(GridformError::NothingToRedo)));
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Document::new();
        doc.set_cell(&c("A1"), "one");
        doc.undo().unwrap();
        assert_eq!(doc.redo_stack.len(), 1);
        doc.set_cell(&c("A1"), "two");
        assert!(doc.redo_stack.is_empty());
    }

    #[test]
    fn test_add_row_and_column() {
        let mut doc = Document::with_extent(2, 25);
        doc.add_row();
        assert!(doc.add_column());
        assert!(!doc.add_column());
        assert_eq!(doc.grid.extent().rows, 3);
        assert_eq!(doc.grid.extent().cols, 26);
    }

    #[test]
    fn test_delete_row_shifts_cells() {
        let mut doc = doc_with_rows(&[["a", "1"], ["b", "2"], ["c", "3"]]);
        doc.delete_row(1);
        assert_eq!(doc.cell_text(&c("A1")), "b");
        assert_eq!(doc.cell_text(&c("B2")), "3");
        assert_eq!(doc.cell_text(&c("A3")), "");
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut doc = Document::new();
        for i in 0..150 {
            doc.set_cell(&c("A1"), &i.to_string());
        }
        assert_eq!(doc.undo_stack.len(), 100);
    }
}
