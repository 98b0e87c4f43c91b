//! Cell coordinate parsing and formatting.
//!
//! Converts between A1-style labels and 1-based (row, column) pairs.
//! Only single-letter columns (`A` through `Z`) are understood.
//!
//! # Examples
//!
//! ```
//! use gridform_engine::engine::{CellCoord, parse_coordinate};
//!
//! let cell = parse_coordinate("b3").unwrap();
//! assert_eq!(cell, CellCoord::new(3, 2));
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{EngineError, Result};

/// Number of addressable columns (`A`..=`Z`).
pub const MAX_COLUMNS: usize = 26;

/// A cell position, 1-based in both dimensions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> CellCoord {
        CellCoord { row, col }
    }

    /// Convert a 1-based column index to letters (1 -> A, 26 -> Z, 27 -> AA).
    ///
    /// Labels past `Z` are display-only; [`parse_coordinate`] rejects them.
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Parse an A1-style label (`"C12"`, case-insensitive) into a coordinate.
///
/// Rows start at 1 and have no leading zeros, so every accepted label
/// prints back as itself (modulo letter case).
pub fn parse_coordinate(label: &str) -> Result<CellCoord> {
    let malformed = || EngineError::MalformedCoordinate(label.to_string());

    let caps = coordinate_re().captures(label).ok_or_else(malformed)?;
    let letter = caps["letter"].as_bytes()[0].to_ascii_uppercase();
    let col = (letter - b'A') as usize + 1;

    let row = caps["row"].parse::<usize>().map_err(|_| malformed())?;
    Ok(CellCoord::new(row, col))
}

fn coordinate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<row>[1-9][0-9]*)$")
            .expect("coordinate regex must compile")
    })
}

impl std::str::FromStr for CellCoord {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_coordinate(s)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellCoord::col_to_letters(self.col), self.row)
    }
}
