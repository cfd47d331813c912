//! Workbook: ordered sheets plus a journal of the edits made to them.
//!
//! The journal records every change that has to reach the file on disk, in
//! the order it happened, so a storage backend can replay the edits onto the
//! original workbook and keep everything this model does not represent
//! (styles, drawings, macros).

use std::collections::HashMap;

use super::cell::CellType;
use super::cell_ref::{CellRef, Range};
use super::search::{TextPattern, find_all};
use super::sheet::{ClearOutcome, Sheet, sheet_key};

/// A recorded change to the workbook.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    RemoveSheet { sheet: String },
    SetValue { sheet: String, cell: CellRef, value: CellType },
    ClearRange { sheet: String, range: Range },
}

/// A search hit somewhere in the workbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub sheet: usize,
    pub cell: CellRef,
}

#[derive(Clone, Debug, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    /// Lowercased sheet name -> position in `sheets`.
    index: HashMap<String, usize>,
    journal: Vec<Edit>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet as loaded from storage. Not journaled.
    /// A name that collides (ignoring case) with an existing sheet is rejected.
    pub fn push_sheet(&mut self, sheet: Sheet) -> Result<(), String> {
        let key = sheet.key();
        if self.index.contains_key(&key) {
            return Err(format!("duplicate sheet name '{}'", sheet.name));
        }
        self.index.insert(key, self.sheets.len());
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Position of a sheet, matched case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&sheet_key(name)).copied()
    }

    pub fn sheet(&self, idx: usize) -> Option<&Sheet> {
        self.sheets.get(idx)
    }

    pub fn sheet_mut(&mut self, idx: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(idx)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.position(name).and_then(|i| self.sheets.get(i))
    }

    /// Delete a sheet, matched case-insensitively. Returns the removed sheet.
    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        let idx = self.position(name)?;
        let sheet = self.sheets.remove(idx);
        self.rebuild_index();
        self.journal.push(Edit::RemoveSheet {
            sheet: sheet.name.clone(),
        });
        Some(sheet)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key(), i))
            .collect();
    }

    /// Write a value into a cell and journal it.
    pub fn write(&mut self, idx: usize, cell: CellRef, value: CellType) -> Result<(), String> {
        let sheet = self
            .sheets
            .get(idx)
            .ok_or_else(|| format!("no sheet at position {}", idx))?;
        sheet.write(cell, value.clone())?;
        self.journal.push(Edit::SetValue {
            sheet: sheet.name.clone(),
            cell,
            value,
        });
        Ok(())
    }

    /// Clear content and formatting of a range and journal it.
    pub fn clear_range(&mut self, idx: usize, range: Range) -> Result<ClearOutcome, String> {
        let sheet = self
            .sheets
            .get_mut(idx)
            .ok_or_else(|| format!("no sheet at position {}", idx))?;
        let outcome = sheet.clear_range(&range);
        self.journal.push(Edit::ClearRange {
            sheet: sheet.name.clone(),
            range,
        });
        Ok(outcome)
    }

    /// Every match of `pattern` in every sheet, sheet by sheet, row-major.
    pub fn find_all(&self, pattern: &TextPattern) -> Vec<Match> {
        self.sheets
            .iter()
            .enumerate()
            .flat_map(|(sheet, s)| {
                find_all(s, pattern)
                    .into_iter()
                    .map(move |cell| Match { sheet, cell })
            })
            .collect()
    }

    pub fn journal(&self) -> &[Edit] {
        &self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;

    fn book(names: &[&str]) -> Workbook {
        let mut wb = Workbook::new();
        for name in names {
            wb.push_sheet(Sheet::new(name)).unwrap();
        }
        wb
    }

    #[test]
    fn test_lookup_ignores_case() {
        let wb = book(&["Cover", "PS"]);
        assert_eq!(wb.position("COVER"), Some(0));
        assert_eq!(wb.position("ps"), Some(1));
        assert_eq!(wb.position("summary"), None);
    }

    #[test]
    fn test_padded_name_is_a_different_sheet() {
        let wb = book(&[" PS "]);
        assert_eq!(wb.position("PS"), None);
        assert_eq!(wb.position(" ps "), Some(0));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut wb = book(&["PS"]);
        assert!(wb.push_sheet(Sheet::new("ps")).is_err());
    }

    #[test]
    fn test_remove_sheet_reindexes_and_journals() {
        let mut wb = book(&["Cover", "PS", "Notes"]);
        let removed = wb.remove_sheet("cover").unwrap();
        assert_eq!(removed.name, "Cover");
        assert_eq!(wb.position("notes"), Some(1));
        assert_eq!(
            wb.journal(),
            &[Edit::RemoveSheet {
                sheet: "Cover".to_string()
            }]
        );
    }

    #[test]
    fn test_failed_write_is_not_journaled() {
        let mut wb = book(&["PS"]);
        wb.sheet_mut(0)
            .unwrap()
            .merged
            .push(Range::parse("A1:B1").unwrap());
        let b1 = CellRef::new(1, 2);
        assert!(wb.write(0, b1, CellType::Text("x".into())).is_err());
        assert!(wb.journal().is_empty());
    }

    #[test]
    fn test_find_all_spans_sheets() {
        let wb = book(&["PS", "Terms"]);
        wb.sheet(0).unwrap().set(CellRef::new(2, 1), Cell::new_text("DDP"));
        wb.sheet(1).unwrap().set(CellRef::new(1, 1), Cell::new_text("ddp"));
        let hits = wb.find_all(&TextPattern::new("DDP").unwrap());
        assert_eq!(
            hits,
            vec![
                Match {
                    sheet: 0,
                    cell: CellRef::new(2, 1)
                },
                Match {
                    sheet: 1,
                    cell: CellRef::new(1, 1)
                },
            ]
        );
    }
}
