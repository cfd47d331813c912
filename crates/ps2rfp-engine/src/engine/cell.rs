//! Cell data structures for the worksheet grid.
//!
//! - [`CellType`] - The content stored in a cell
//! - [`Cell`] - Stored content plus the cached result a workbook keeps for formulas
//! - [`Grid`] - Sparse storage for cells (backed by `DashMap`)

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;
use super::format::format_number;

/// The type of content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Error value such as `#N/A` or `#DIV/0!`.
    Error(String),
    /// Formula text without the leading '='.
    Formula(String),
}

impl CellType {
    /// Text as the user sees it in the formula bar.
    pub fn display(&self) -> String {
        match self {
            CellType::Empty => String::new(),
            CellType::Text(s) => s.clone(),
            CellType::Number(n) => format_number(*n),
            CellType::Bool(true) => "TRUE".to_string(),
            CellType::Bool(false) => "FALSE".to_string(),
            CellType::Error(e) => e.clone(),
            CellType::Formula(f) => format!("={}", f),
        }
    }

    /// Guess the type of a raw stored value ("12" -> Number, otherwise Text).
    pub fn from_raw(raw: &str) -> CellType {
        if raw.is_empty() {
            return CellType::Empty;
        }
        // Keep codes like "007" as text.
        let leading_zero = raw.len() > 1 && raw.starts_with('0') && !raw.starts_with("0.");
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && !leading_zero && raw.trim() == raw => CellType::Number(n),
            _ => CellType::Text(raw.to_string()),
        }
    }
}

/// A cell in a worksheet grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub contents: CellType,
    /// Last computed value stored alongside the contents, if the workbook
    /// has one. Plain values cache themselves; formulas only when the file
    /// was last saved by an engine that calculated them.
    pub cached_value: Option<CellType>,
}

impl Cell {
    pub fn new_text(text: &str) -> Cell {
        Cell {
            contents: CellType::Text(text.to_string()),
            cached_value: Some(CellType::Text(text.to_string())),
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            contents: CellType::Number(n),
            cached_value: Some(CellType::Number(n)),
        }
    }

    /// Create a formula cell. `cached` is the value the file stored for it.
    pub fn new_formula(formula: &str, cached: Option<CellType>) -> Cell {
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        Cell {
            contents: CellType::Formula(formula.to_string()),
            cached_value: cached.filter(|c| !matches!(c, CellType::Formula(_) | CellType::Empty)),
        }
    }

    /// Plain value cell from its content; the value is its own cache.
    pub fn from_value(contents: CellType) -> Cell {
        let cached_value = match &contents {
            CellType::Empty | CellType::Formula(_) => None,
            other => Some(other.clone()),
        };
        Cell {
            contents,
            cached_value,
        }
    }

    /// Text used for substring searches.
    pub fn search_text(&self) -> String {
        self.contents.display()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.contents, CellType::Empty)
    }
}

/// Sparse grid storage.
pub type Grid = DashMap<CellRef, Cell>;
