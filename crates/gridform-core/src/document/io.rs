use super::Document;
use crate::error::{GridformError, Result};
use crate::storage::{parse_csv, write_csv, write_markdown};
use gridform_engine::engine::{GridProvider, SheetGrid};
use std::path::{Path, PathBuf};

impl Document {
    /// Replace the grid with the contents of a CSV file.
    ///
    /// The current extent is kept and grows to fit the file. Undo history
    /// is cleared.
    pub fn load_csv(&mut self, path: &Path) -> Result<()> {
        let cells = parse_csv(path)?;

        let extent = self.grid.extent();
        let mut grid = SheetGrid::new(extent.rows, extent.cols);
        for (coord, text) in &cells {
            grid.write_text(coord, text);
        }
        log::debug!("loaded {} cells from {}", cells.len(), path.display());

        self.grid = grid;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(GridformError::NoFilePath);
        };
        write_csv(&path, &self.grid)?;
        self.modified = false;
        Ok(path)
    }

    /// Write the grid as CSV without changing the document's file path.
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, &self.grid)
    }

    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_markdown(path, &self.grid)?;
        Ok(())
    }
}
