//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `FIND_AND_REPLACE`) and
//!   matched case-insensitively.
//! - `FUNCTIONS` is ordered like the [`Function`] enum; if you add a
//!   function, add its entry at the same position and a `Formula` variant.

use regex::{NoExpand, Regex};
use std::collections::HashSet;

use crate::engine::{CellRange, GridProvider, parse_number, values};
use crate::error::{EngineError, Result};

/// The fixed set of supported functions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Function {
    Sum,
    Average,
    Max,
    Min,
    Count,
    Trim,
    Upper,
    Lower,
    RemoveDuplicates,
    FindAndReplace,
}

/// How a function delivers its effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FunctionKind {
    /// Numeric result computed over a range.
    Aggregate,
    /// String transform of a literal argument.
    Text,
    /// Mutates the grid in place; no scalar result.
    Mutation,
}

pub struct FunctionSpec {
    pub function: Function,
    pub name: &'static str,
    pub arity: usize,
    pub kind: FunctionKind,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec {
        function: Function::Sum,
        name: "SUM",
        arity: 1,
        kind: FunctionKind::Aggregate,
        usage: "SUM(A1:B5)",
        description: "Sum of numeric values in a cell range",
    },
    FunctionSpec {
        function: Function::Average,
        name: "AVERAGE",
        arity: 1,
        kind: FunctionKind::Aggregate,
        usage: "AVERAGE(A1:B5)",
        description: "Average of numeric values in a cell range",
    },
    FunctionSpec {
        function: Function::Max,
        name: "MAX",
        arity: 1,
        kind: FunctionKind::Aggregate,
        usage: "MAX(A1:B5)",
        description: "Maximum numeric value in a cell range",
    },
    FunctionSpec {
        function: Function::Min,
        name: "MIN",
        arity: 1,
        kind: FunctionKind::Aggregate,
        usage: "MIN(A1:B5)",
        description: "Minimum numeric value in a cell range",
    },
    FunctionSpec {
        function: Function::Count,
        name: "COUNT",
        arity: 1,
        kind: FunctionKind::Aggregate,
        usage: "COUNT(A1:B5)",
        description: "Count of cells holding a number",
    },
    FunctionSpec {
        function: Function::Trim,
        name: "TRIM",
        arity: 1,
        kind: FunctionKind::Text,
        usage: "TRIM(text)",
        description: "Text with surrounding whitespace removed",
    },
    FunctionSpec {
        function: Function::Upper,
        name: "UPPER",
        arity: 1,
        kind: FunctionKind::Text,
        usage: "UPPER(text)",
        description: "Text converted to upper case",
    },
    FunctionSpec {
        function: Function::Lower,
        name: "LOWER",
        arity: 1,
        kind: FunctionKind::Text,
        usage: "LOWER(text)",
        description: "Text converted to lower case",
    },
    FunctionSpec {
        function: Function::RemoveDuplicates,
        name: "REMOVE_DUPLICATES",
        arity: 1,
        kind: FunctionKind::Mutation,
        usage: "REMOVE_DUPLICATES(A1:B10)",
        description: "Delete rows whose cells repeat an earlier row of the range",
    },
    FunctionSpec {
        function: Function::FindAndReplace,
        name: "FIND_AND_REPLACE",
        arity: 3,
        kind: FunctionKind::Mutation,
        usage: "FIND_AND_REPLACE(A1:B10, pattern, replacement)",
        description: "Replace every regex match in each cell of a range",
    },
];

impl Function {
    /// Look up a function by spreadsheet name, ignoring case.
    pub fn from_name(name: &str) -> Option<Function> {
        FUNCTIONS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .map(|spec| spec.function)
    }

    pub fn spec(self) -> &'static FunctionSpec {
        &FUNCTIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn arity(self) -> usize {
        self.spec().arity
    }

    pub fn kind(self) -> FunctionKind {
        self.spec().kind
    }
}

pub(crate) fn sum<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> f64 {
    values(grid, range).into_iter().sum()
}

pub(crate) fn average<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> Result<f64> {
    let values = values(grid, range);
    if values.is_empty() {
        return Err(EngineError::DivisionByEmptyRange(range.to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub(crate) fn max<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> Result<f64> {
    values(grid, range)
        .into_iter()
        .reduce(f64::max)
        .ok_or_else(|| EngineError::EmptyRangeForExtremum {
            function: Function::Max.name(),
            range: range.to_string(),
        })
}

pub(crate) fn min<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> Result<f64> {
    values(grid, range)
        .into_iter()
        .reduce(f64::min)
        .ok_or_else(|| EngineError::EmptyRangeForExtremum {
            function: Function::Min.name(),
            range: range.to_string(),
        })
}

/// Number of cells whose text parses as a number; blanks and text don't count.
pub(crate) fn count<G: GridProvider + ?Sized>(grid: &G, range: &CellRange) -> usize {
    range
        .iter()
        .filter(|coord| parse_number(&grid.read_text(coord)).is_some())
        .count()
}

/// Delete every row of `range` that repeats an earlier row's texts.
///
/// Duplicates are collected first and deleted bottom-up, so no index
/// compensation is needed. Rows past the grid's extent are not examined.
/// Returns the deleted row numbers in ascending order, as they were
/// before deletion.
pub(crate) fn remove_duplicates<G: GridProvider + ?Sized>(
    grid: &mut G,
    range: &CellRange,
) -> Vec<usize> {
    if range.is_empty() {
        return Vec::new();
    }
    let last_row = range.end_row.min(grid.extent().rows);

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut duplicates = Vec::new();
    for row in range.start_row..=last_row {
        if !seen.insert(range.row_texts(grid, row)) {
            duplicates.push(row);
        }
    }

    for row in duplicates.iter().rev() {
        grid.delete_row(*row);
    }
    duplicates
}

/// Replace every match of `pattern` in each cell of `range`, once.
///
/// The replacement is literal text: `$` sequences are not expanded.
/// Returns the number of cells that changed.
pub(crate) fn find_and_replace<G: GridProvider + ?Sized>(
    grid: &mut G,
    range: &CellRange,
    pattern: &Regex,
    replacement: &str,
) -> usize {
    let mut changed = 0;
    for coord in range.iter() {
        let text = grid.read_text(&coord);
        let replaced = pattern.replace_all(&text, NoExpand(replacement));
        if replaced != text {
            grid.write_text(&coord, &replaced);
            changed += 1;
        }
    }
    changed
}
