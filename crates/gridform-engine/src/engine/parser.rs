//! Formula parser
//!
//! Recognises a single function call, `NAME(arg, arg, ...)`, optionally
//! preceded by `=`. Arguments are raw text: they may not contain parentheses
//! and a comma always separates arguments.

use std::fmt;

use crate::builtins::Function;
use crate::error::{EngineError, Result};

/// A parsed function call: the function and its trimmed raw arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaInvocation {
    pub function: Function,
    pub args: Vec<String>,
}

impl fmt::Display for FormulaInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function.name(), self.args.join(", "))
    }
}

/// Parse formula text into an invocation.
///
/// # Example
/// ```rust
/// use gridform_engine::builtins::Function;
/// use gridform_engine::engine::parse_formula;
///
/// let inv = parse_formula("=sum(A1:A10)").unwrap();
/// assert_eq!(inv.function, Function::Sum);
/// assert_eq!(inv.args, vec!["A1:A10"]);
/// ```
pub fn parse_formula(text: &str) -> Result<FormulaInvocation> {
    FormulaParser::new(text)
        .parse()
        .ok_or_else(|| EngineError::UnrecognizedFormula(text.trim().to_string()))
}

struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Option<FormulaInvocation> {
        self.skip_whitespace();
        self.eat('=');
        self.skip_whitespace();

        let function = Function::from_name(self.identifier()?)?;

        self.skip_whitespace();
        if !self.eat('(') {
            return None;
        }
        let args = self.arguments()?;
        if !self.eat(')') {
            return None;
        }

        self.skip_whitespace();
        if !self.is_at_end() {
            return None;
        }

        Some(FormulaInvocation { function, args })
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        (self.pos > start).then(|| &self.input[start..self.pos])
    }

    /// Raw argument text up to (not including) the closing parenthesis.
    fn arguments(&mut self) -> Option<Vec<String>> {
        let start = self.pos;
        loop {
            match self.peek_char()? {
                ')' => break,
                '(' => return None,
                c => self.pos += c.len_utf8(),
            }
        }

        let body = &self.input[start..self.pos];
        Some(body.split(',').map(|arg| arg.trim().to_string()).collect())
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}
