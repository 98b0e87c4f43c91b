//! CSV import/export functionality

use crate::error::{GridformError, Result};
use gridform_engine::engine::{CellCoord, GridProvider, MAX_COLUMNS, SheetGrid, parse_number};
use std::io::Write;
use std::path::Path;

/// Parse a CSV file into non-empty cells, with the first record at row 1.
pub fn parse_csv(path: &Path) -> Result<Vec<(CellCoord, String)>> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_content(&content)
}

pub(crate) fn parse_csv_content(content: &str) -> Result<Vec<(CellCoord, String)>> {
    let mut cells = Vec::new();

    for (row_idx, line) in content.lines().enumerate() {
        let fields = parse_csv_line(line);
        if fields.len() > MAX_COLUMNS && fields[MAX_COLUMNS..].iter().any(|f| !f.is_empty()) {
            return Err(GridformError::Parse {
                line: row_idx + 1,
                message: format!("more than {} columns", MAX_COLUMNS),
            });
        }
        for (col_idx, field) in fields.into_iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            cells.push((CellCoord::new(row_idx + 1, col_idx + 1), field));
        }
    }

    Ok(cells)
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    fields.push(finish_field(&mut current, field_was_quoted));
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    fields.push(finish_field(&mut current, field_was_quoted));
    fields
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted { field } else { field.trim().to_string() }
}

/// Export the grid to CSV, from A1 to the last populated row and column.
pub fn write_csv(path: &Path, grid: &SheetGrid) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_csv_to(&mut file, grid)?;
    Ok(())
}

pub fn write_csv_to<W: Write>(w: &mut W, grid: &SheetGrid) -> std::io::Result<()> {
    let Some((_, max)) = grid.populated_bounds() else {
        return Ok(());
    };

    for row in 1..=max.row {
        let fields: Vec<String> = (1..=max.col)
            .map(|col| escape_csv_field(&grid.read_text(&CellCoord::new(row, col))))
            .collect();
        writeln!(w, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps; plain numbers
    // such as "-3" are left alone.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@'))
        && parse_number(field).is_none()
    {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
        || safe_field.trim() != safe_field
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
