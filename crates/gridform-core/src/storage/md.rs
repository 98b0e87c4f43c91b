//! Markdown export functionality

use gridform_engine::engine::{CellCoord, GridProvider, SheetGrid};
use std::io::Write;
use std::path::Path;

/// Write the grid to a markdown file
pub fn write_markdown(path: &Path, grid: &SheetGrid) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_markdown_to(&mut file, grid)
}

pub fn write_markdown_to<W: Write>(w: &mut W, grid: &SheetGrid) -> std::io::Result<()> {
    writeln!(w, "# Sheet")?;
    writeln!(w)?;

    let Some((_, max)) = grid.populated_bounds() else {
        writeln!(w, "*Empty spreadsheet*")?;
        return Ok(());
    };

    // Header with column letters
    write!(w, "|   |")?;
    for col in 1..=max.col {
        write!(w, " {} |", CellCoord::col_to_letters(col))?;
    }
    writeln!(w)?;

    write!(w, "|---|")?;
    for _ in 1..=max.col {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in 1..=max.row {
        write!(w, "| {} |", row)?;
        for col in 1..=max.col {
            let text = grid.read_text(&CellCoord::new(row, col));
            write!(w, " {} |", escape_markdown(&text))?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
