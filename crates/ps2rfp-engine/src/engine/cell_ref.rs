//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and 1-based column/row coordinates, matching
//! the numbering Excel itself uses.
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Last column of an OOXML worksheet (`XFD`).
pub const MAX_COL: u32 = 16_384;
/// Last row of an OOXML worksheet.
pub const MAX_ROW: u32 = 1_048_576;

static A1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?(?<letters>[A-Za-z]{1,3})\$?(?<numbers>[0-9]+)$").expect("valid A1 pattern")
});

/// A reference to a cell by row and column (1-based).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "$B$2").
    /// Returns None if the input is invalid or outside the sheet.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = A1_RE.captures(name.trim())?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<u32>().ok()?;
        if row == 0 || row > MAX_ROW {
            return None;
        }
        Some(CellRef::new(row, col))
    }

    /// The cell directly below this one, if still on the sheet.
    pub fn below(&self, rows: u32) -> Option<CellRef> {
        let row = self.row.checked_add(rows)?;
        (row <= MAX_ROW).then_some(CellRef::new(row, self.col))
    }
}

/// Convert a 1-based column index to letters (1 -> A, 26 -> Z, 27 -> AA).
/// Returns an empty string for 0.
pub fn col_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

/// Convert column letters to a 1-based index (A -> 1, XFD -> 16384).
pub fn letters_to_col(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0u32;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() - b'A') as u32 + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    (acc <= MAX_COL).then_some(acc)
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row)
    }
}

/// An inclusive rectangular block of cells.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: CellRef,
    pub end: CellRef,
}

impl Range {
    /// Build a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> Range {
        Range {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Whole columns `first..=last`.
    pub fn columns(first: u32, last: u32) -> Range {
        Range::new(CellRef::new(1, first), CellRef::new(MAX_ROW, last))
    }

    /// Parse "A1:B2" (or a lone "A1").
    pub fn parse(s: &str) -> Option<Range> {
        match s.split_once(':') {
            Some((a, b)) => Some(Range::new(CellRef::from_str(a)?, CellRef::from_str(b)?)),
            None => CellRef::from_str(s).map(|c| Range::new(c, c)),
        }
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    /// True if any column of this range falls inside `first..=last`.
    pub fn touches_columns(&self, first: u32, last: u32) -> bool {
        self.end.col >= first && self.start.col <= last
    }

    /// True if the two ranges share at least one cell.
    pub fn intersects(&self, other: &Range) -> bool {
        self.touches_columns(other.start.col, other.end.col)
            && self.end.row >= other.start.row
            && self.start.row <= other.end.row
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
