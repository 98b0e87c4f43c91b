//! Typed formulas.
//!
//! [`Formula::from_invocation`] turns the parser's raw arguments into typed
//! ones: ranges are resolved, arity is checked and the FIND_AND_REPLACE
//! pattern is compiled. It never touches the grid, so a formula that
//! converts successfully can only fail afterwards on empty-range aggregates.

use regex::Regex;

use super::parser::{FormulaInvocation, parse_formula};
use super::range::{CellRange, parse_range};
use crate::builtins::Function;
use crate::error::{EngineError, Result};

#[derive(Clone, Debug)]
pub enum Formula {
    Sum(CellRange),
    Average(CellRange),
    Max(CellRange),
    Min(CellRange),
    Count(CellRange),
    Trim(String),
    Upper(String),
    Lower(String),
    RemoveDuplicates(CellRange),
    FindAndReplace {
        range: CellRange,
        pattern: Regex,
        replacement: String,
    },
}

impl Formula {
    /// Parse and resolve formula text in one step.
    pub fn parse(text: &str) -> Result<Formula> {
        Formula::from_invocation(parse_formula(text)?)
    }

    pub fn from_invocation(invocation: FormulaInvocation) -> Result<Formula> {
        let FormulaInvocation { function, args } = invocation;
        if args.len() != function.arity() {
            return Err(EngineError::ArgumentCount {
                function: function.name(),
                expected: function.arity(),
                actual: args.len(),
            });
        }

        let mut args = args.into_iter();
        let mut next = move || args.next().unwrap_or_default();

        let formula = match function {
            Function::Sum => Formula::Sum(parse_range(&next())?),
            Function::Average => Formula::Average(parse_range(&next())?),
            Function::Max => Formula::Max(parse_range(&next())?),
            Function::Min => Formula::Min(parse_range(&next())?),
            Function::Count => Formula::Count(parse_range(&next())?),
            Function::Trim => Formula::Trim(next()),
            Function::Upper => Formula::Upper(next()),
            Function::Lower => Formula::Lower(next()),
            Function::RemoveDuplicates => Formula::RemoveDuplicates(parse_range(&next())?),
            Function::FindAndReplace => {
                let range = parse_range(&next())?;
                let pattern = next();
                let compiled = Regex::new(&pattern).map_err(|e| EngineError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                Formula::FindAndReplace {
                    range,
                    pattern: compiled,
                    replacement: next(),
                }
            }
        };
        Ok(formula)
    }

    pub fn function(&self) -> Function {
        match self {
            Formula::Sum(_) => Function::Sum,
            Formula::Average(_) => Function::Average,
            Formula::Max(_) => Function::Max,
            Formula::Min(_) => Function::Min,
            Formula::Count(_) => Function::Count,
            Formula::Trim(_) => Function::Trim,
            Formula::Upper(_) => Function::Upper,
            Formula::Lower(_) => Function::Lower,
            Formula::RemoveDuplicates(_) => Function::RemoveDuplicates,
            Formula::FindAndReplace { .. } => Function::FindAndReplace,
        }
    }

    /// The range argument, if the function takes one.
    pub fn range(&self) -> Option<&CellRange> {
        match self {
            Formula::Sum(range)
            | Formula::Average(range)
            | Formula::Max(range)
            | Formula::Min(range)
            | Formula::Count(range)
            | Formula::RemoveDuplicates(range)
            | Formula::FindAndReplace { range, .. } => Some(range),
            Formula::Trim(_) | Formula::Upper(_) | Formula::Lower(_) => None,
        }
    }
}
