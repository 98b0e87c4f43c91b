//! Formula evaluation against a grid.
//!
//! One call handles one submitted formula: parse, resolve, check range
//! sizes, then dispatch. Scalar results are written to the target cell;
//! REMOVE_DUPLICATES and FIND_AND_REPLACE mutate their range instead and
//! leave the target alone. Nothing is kept between calls.

use super::cell_ref::CellCoord;
use super::format::{Value, format_value};
use super::formula::Formula;
use super::grid::GridProvider;
use super::parser::parse_formula;
use crate::builtins;
use crate::error::{EngineError, Result};

/// Ranges larger than this are rejected before any cell is read.
pub const DEFAULT_MAX_RANGE_CELLS: usize = 1_000_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EvalOptions {
    pub max_range_cells: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_range_cells: DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

/// What a single evaluation did.
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    /// A scalar was computed and written to the target cell.
    Scalar(Value),
    /// REMOVE_DUPLICATES deleted these rows (numbered as before deletion).
    RowsRemoved(Vec<usize>),
    /// FIND_AND_REPLACE changed this many cells.
    CellsReplaced(usize),
    /// The text was not a recognised formula; the grid is untouched.
    Ignored,
}

impl Evaluation {
    /// Whether the grid was changed.
    pub fn is_mutation(&self) -> bool {
        match self {
            Evaluation::Scalar(_) => true,
            Evaluation::RowsRemoved(rows) => !rows.is_empty(),
            Evaluation::CellsReplaced(n) => *n > 0,
            Evaluation::Ignored => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(options: EvalOptions) -> Evaluator {
        Evaluator { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluate `formula_text` as submitted against `target`.
    ///
    /// Unrecognised text is not an error: it yields [`Evaluation::Ignored`].
    pub fn evaluate<G: GridProvider + ?Sized>(
        &self,
        grid: &mut G,
        formula_text: &str,
        target: &CellCoord,
    ) -> Result<Evaluation> {
        let invocation = match parse_formula(formula_text) {
            Ok(invocation) => invocation,
            Err(EngineError::UnrecognizedFormula(text)) => {
                log::info!("ignoring unrecognized formula '{}' at {}", text, target);
                return Ok(Evaluation::Ignored);
            }
            Err(e) => return Err(e),
        };
        log::debug!("evaluating {} at {}", invocation, target);

        let formula = Formula::from_invocation(invocation)?;
        let evaluation = self.compute(grid, &formula)?;

        if let Evaluation::Scalar(value) = &evaluation {
            grid.write_text(target, &format_value(value));
        }
        Ok(evaluation)
    }

    /// Apply a resolved formula without writing any scalar result.
    pub fn compute<G: GridProvider + ?Sized>(
        &self,
        grid: &mut G,
        formula: &Formula,
    ) -> Result<Evaluation> {
        if let Some(range) = formula.range() {
            let cells = range.cell_count();
            if cells > self.options.max_range_cells {
                return Err(EngineError::RangeTooLarge {
                    range: range.to_string(),
                    cells,
                    limit: self.options.max_range_cells,
                });
            }
        }

        let evaluation = match formula {
            Formula::Sum(range) => Evaluation::Scalar(Value::Number(builtins::sum(grid, range))),
            Formula::Average(range) => {
                Evaluation::Scalar(Value::Number(builtins::average(grid, range)?))
            }
            Formula::Max(range) => Evaluation::Scalar(Value::Number(builtins::max(grid, range)?)),
            Formula::Min(range) => Evaluation::Scalar(Value::Number(builtins::min(grid, range)?)),
            Formula::Count(range) => {
                Evaluation::Scalar(Value::Number(builtins::count(grid, range) as f64))
            }
            Formula::Trim(text) => Evaluation::Scalar(Value::Text(text.trim().to_string())),
            Formula::Upper(text) => Evaluation::Scalar(Value::Text(text.to_uppercase())),
            Formula::Lower(text) => Evaluation::Scalar(Value::Text(text.to_lowercase())),
            Formula::RemoveDuplicates(range) => {
                let removed = builtins::remove_duplicates(grid, range);
                log::debug!("REMOVE_DUPLICATES({}) removed rows {:?}", range, removed);
                Evaluation::RowsRemoved(removed)
            }
            Formula::FindAndReplace {
                range,
                pattern,
                replacement,
            } => {
                let changed = builtins::find_and_replace(grid, range, pattern, replacement);
                log::debug!("FIND_AND_REPLACE({}) changed {} cells", range, changed);
                Evaluation::CellsReplaced(changed)
            }
        };
        Ok(evaluation)
    }
}

/// Evaluate with default options.
pub fn evaluate<G: GridProvider + ?Sized>(
    grid: &mut G,
    formula_text: &str,
    target: &CellCoord,
) -> Result<Evaluation> {
    Evaluator::default().evaluate(grid, formula_text, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SheetGrid;
    use pretty_assertions::assert_eq;

    fn c(label: &str) -> CellCoord {
        label.parse().unwrap()
    }

    fn column(texts: &[&str]) -> SheetGrid {
        let mut grid = SheetGrid::new(20, 10);
        for (i, text) in texts.iter().enumerate() {
            grid.write_text(&CellCoord::new(i + 1, 1), text);
        }
        grid
    }

    #[test]
    fn test_sum_writes_target() {
        let mut grid = column(&["5"]);
        let result = evaluate(&mut grid, "SUM(A1:A1)", &c("B1")).unwrap();
        assert_eq!(result, Evaluation::Scalar(Value::Number(5.0)));
        assert_eq!(grid.read_text(&c("B1")), "5");
    }

    #[test]
    fn test_average_writes_fraction() {
        let mut grid = column(&["1", "2"]);
        evaluate(&mut grid, "=AVERAGE(A1:A2)", &c("A3")).unwrap();
        assert_eq!(grid.read_text(&c("A3")), "1.5");
    }

    #[test]
    fn test_average_empty_range_leaves_target_untouched() {
        let mut grid = column(&["1"]);
        grid.write_text(&c("B1"), "old");
        let err = evaluate(&mut grid, "AVERAGE(A2:A1)", &c("B1")).unwrap_err();
        assert_eq!(err, EngineError::DivisionByEmptyRange("A2:A1".into()));
        assert_eq!(grid.read_text(&c("B1")), "old");
    }

    #[test]
    fn test_reversed_range_sum_and_count_are_zero() {
        let mut grid = column(&["4", "5"]);
        evaluate(&mut grid, "SUM(A2:A1)", &c("C1")).unwrap();
        evaluate(&mut grid, "COUNT(A2:A1)", &c("C2")).unwrap();
        assert_eq!(grid.read_text(&c("C1")), "0");
        assert_eq!(grid.read_text(&c("C2")), "0");
    }

    #[test]
    fn test_count_numeric_cells() {
        let mut grid = column(&["3", "x", "", "7"]);
        evaluate(&mut grid, "COUNT(A1:A4)", &c("B1")).unwrap();
        assert_eq!(grid.read_text(&c("B1")), "2");
    }

    #[test]
    fn test_max_min_write_target() {
        let mut grid = column(&["3", "9", "-2"]);
        evaluate(&mut grid, "max(A1:A3)", &c("B1")).unwrap();
        evaluate(&mut grid, "min(A1:A3)", &c("B2")).unwrap();
        assert_eq!(grid.read_text(&c("B1")), "9");
        assert_eq!(grid.read_text(&c("B2")), "-2");
    }

    #[test]
    fn test_text_functions() {
        let mut grid = SheetGrid::new(5, 5);
        evaluate(&mut grid, "UPPER(mixed Case)", &c("A1")).unwrap();
        evaluate(&mut grid, "LOWER(MiXeD)", &c("A2")).unwrap();
        evaluate(&mut grid, "TRIM(  padded  )", &c("A3")).unwrap();
        assert_eq!(grid.read_text(&c("A1")), "MIXED CASE");
        assert_eq!(grid.read_text(&c("A2")), "mixed");
        assert_eq!(grid.read_text(&c("A3")), "padded");
    }

    #[test]
    fn test_text_functions_accept_blank_argument() {
        let mut grid = SheetGrid::new(5, 5);
        grid.write_text(&c("A1"), "old");
        let result = evaluate(&mut grid, "TRIM(   )", &c("A1")).unwrap();
        assert_eq!(result, Evaluation::Scalar(Value::Text(String::new())));
        assert_eq!(grid.read_text(&c("A1")), "");

        evaluate(&mut grid, "UPPER( )", &c("A2")).unwrap();
        assert_eq!(grid.read_text(&c("A2")), "");
    }

    #[test]
    fn test_sum_of_negative_zero_writes_zero() {
        let mut grid = column(&["-0"]);
        evaluate(&mut grid, "SUM(A1)", &c("B1")).unwrap();
        assert_eq!(grid.read_text(&c("B1")), "0");
    }

    #[test]
    fn test_unrecognized_formula_is_ignored() {
        let mut grid = column(&["1"]);
        grid.write_text(&c("B1"), "keep");
        let result = evaluate(&mut grid, "hello world", &c("B1")).unwrap();
        assert_eq!(result, Evaluation::Ignored);
        assert!(!result.is_mutation());
        assert_eq!(grid.read_text(&c("B1")), "keep");
    }

    #[test]
    fn test_remove_duplicates_does_not_touch_target() {
        let mut grid = SheetGrid::new(3, 3);
        for (row, (a, b)) in [("x", "1"), ("x", "1"), ("y", "2")].iter().enumerate() {
            grid.write_text(&CellCoord::new(row + 1, 1), a);
            grid.write_text(&CellCoord::new(row + 1, 2), b);
        }
        grid.write_text(&c("C1"), "formula cell");

        let result = evaluate(&mut grid, "REMOVE_DUPLICATES(A1:B3)", &c("C1")).unwrap();

        assert_eq!(result, Evaluation::RowsRemoved(vec![2]));
        assert_eq!(grid.extent().rows, 2);
        assert_eq!(grid.read_text(&c("A2")), "y");
        assert_eq!(grid.read_text(&c("B2")), "2");
        assert_eq!(grid.read_text(&c("C1")), "formula cell");
    }

    #[test]
    fn test_find_and_replace_mutates_range_only() {
        let mut grid = column(&["foobar", "nofood", "foo"]);
        let result = evaluate(&mut grid, "FIND_AND_REPLACE(A1:A2, foo, bar)", &c("B1")).unwrap();

        assert_eq!(result, Evaluation::CellsReplaced(2));
        assert_eq!(grid.read_text(&c("A1")), "barbar");
        assert_eq!(grid.read_text(&c("A2")), "nobard");
        assert_eq!(grid.read_text(&c("A3")), "foo");
        assert_eq!(grid.read_text(&c("B1")), "");
    }

    #[test]
    fn test_find_and_replace_writes_dollar_replacement_verbatim() {
        let mut grid = column(&["price 5"]);
        let result = evaluate(&mut grid, "FIND_AND_REPLACE(A1, price, $USD)", &c("B1")).unwrap();
        assert_eq!(result, Evaluation::CellsReplaced(1));
        assert_eq!(grid.read_text(&c("A1")), "$USD 5");
    }

    #[test]
    fn test_find_and_replace_twice_converges() {
        let mut grid = column(&["foobar", "nofood"]);
        evaluate(&mut grid, "FIND_AND_REPLACE(A1:A2, foo, bar)", &c("B1")).unwrap();
        let second = evaluate(&mut grid, "FIND_AND_REPLACE(A1:A2, foo, bar)", &c("B1")).unwrap();
        assert_eq!(second, Evaluation::CellsReplaced(0));
        assert_eq!(grid.read_text(&c("A1")), "barbar");
    }

    #[test]
    fn test_invalid_pattern_leaves_grid_untouched() {
        let mut grid = column(&["abc"]);
        // '(' inside arguments is outside the grammar
        let ignored = evaluate(&mut grid, "FIND_AND_REPLACE(A1, (, x)", &c("B1"));
        assert_eq!(ignored, Ok(Evaluation::Ignored));

        let err = evaluate(&mut grid, "FIND_AND_REPLACE(A1, [a, x)", &c("B1")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { .. }));
        assert_eq!(grid.read_text(&c("A1")), "abc");
    }

    #[test]
    fn test_malformed_range_is_surfaced() {
        let mut grid = column(&["1"]);
        let err = evaluate(&mut grid, "SUM(1A:A2)", &c("B1")).unwrap_err();
        assert_eq!(err, EngineError::MalformedRange("1A:A2".into()));
        assert_eq!(grid.read_text(&c("B1")), "");
    }

    #[test]
    fn test_range_size_limit() {
        let mut grid = column(&["1"]);
        let evaluator = Evaluator::new(EvalOptions { max_range_cells: 10 });
        let err = evaluator
            .evaluate(&mut grid, "SUM(A1:B6)", &c("C1"))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::RangeTooLarge {
                range: "A1:B6".into(),
                cells: 12,
                limit: 10,
            }
        );
        assert!(evaluator.evaluate(&mut grid, "SUM(A1:B5)", &c("C1")).is_ok());
    }
}
