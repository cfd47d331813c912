//! Case-insensitive substring search and replace over sheet cells.
//!
//! Searches walk cells row by row, left to right, the same order a
//! spreadsheet's find dialog uses with "search by rows".

use regex::{NoExpand, Regex};

use super::cell_ref::CellRef;
use super::sheet::Sheet;

/// A case-insensitive literal substring.
#[derive(Clone, Debug)]
pub struct TextPattern {
    re: Regex,
}

impl TextPattern {
    pub fn new(needle: &str) -> Result<TextPattern, String> {
        if needle.is_empty() {
            return Err("search text is empty".to_string());
        }
        let re = Regex::new(&format!("(?i){}", regex::escape(needle)))
            .map_err(|e| format!("invalid search text '{}': {}", needle, e))?;
        Ok(TextPattern { re })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Replace every occurrence, keeping the surrounding text.
    /// Returns None when nothing matched.
    pub fn replace_all(&self, text: &str, replacement: &str) -> Option<String> {
        if !self.re.is_match(text) {
            return None;
        }
        Some(self.re.replace_all(text, NoExpand(replacement)).into_owned())
    }
}

/// All cells whose text contains `pattern`, in row-major order.
pub fn find_all(sheet: &Sheet, pattern: &TextPattern) -> Vec<CellRef> {
    sheet
        .cells_sorted()
        .into_iter()
        .filter(|(_, cell)| pattern.is_match(&cell.search_text()))
        .map(|(cell_ref, _)| cell_ref)
        .collect()
}

/// The next cell after `after` whose text contains `pattern`, wrapping to
/// the top of the sheet. Never returns `after` itself.
pub fn find_next(sheet: &Sheet, pattern: &TextPattern, after: CellRef) -> Option<CellRef> {
    let matches = find_all(sheet, pattern);
    let key = |c: &CellRef| (c.row, c.col);
    matches
        .iter()
        .find(|c| key(c) > key(&after))
        .or_else(|| matches.iter().find(|c| key(c) < key(&after)))
        .copied()
}
