//! Workbook model API.
//!
//! This module provides the in-memory spreadsheet the sanitizer edits:
//!
//! - [`Cell`], [`CellType`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`], [`Range`] - A1 notation ↔ 1-based row/column indices
//! - [`Sheet`] - Grid plus merged regions and floating [`Shape`]s
//! - [`Workbook`] - Ordered sheets with case-insensitive lookup and an edit journal
//! - [`TextPattern`], [`find_all`], [`find_next`] - Substring search

mod cell;
mod cell_ref;
mod format;
mod search;
mod shape;
mod sheet;
mod workbook;

pub use cell::{Cell, CellType, Grid};
pub use cell_ref::{CellRef, MAX_COL, MAX_ROW, Range, col_to_letters, letters_to_col};
pub use format::format_number;
pub use search::{TextPattern, find_all, find_next};
pub use shape::{
    DEFAULT_COL_WIDTH_PT, DEFAULT_ROW_HEIGHT_PT, Geometry, Shape, column_left, row_top,
};
pub use sheet::{ClearOutcome, Sheet, sheet_key};
pub use workbook::{Edit, Match, Workbook};
