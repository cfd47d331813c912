//! A single worksheet: sparse grid, merged regions and floating shapes.

use super::cell::{Cell, CellType, Grid};
use super::cell_ref::{CellRef, Range};
use super::shape::Shape;

/// What a range clear removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClearOutcome {
    /// Cells that held content and were removed.
    pub cells: usize,
    /// Merged regions dropped because they overlapped the range.
    pub unmerged: Vec<Range>,
    /// Shapes anchored inside the range, removed along with it.
    pub shapes_removed: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
    pub merged: Vec<Range>,
    pub shapes: Vec<Shape>,
}

impl Sheet {
    pub fn new(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            grid: Grid::new(),
            merged: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Normalized lookup key for this sheet's name.
    pub fn key(&self) -> String {
        sheet_key(&self.name)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<Cell> {
        self.grid.get(cell_ref).map(|r| r.clone())
    }

    pub fn set(&self, cell_ref: CellRef, cell: Cell) {
        if cell.is_empty() && cell.cached_value.is_none() {
            self.grid.remove(&cell_ref);
        } else {
            self.grid.insert(cell_ref, cell);
        }
    }

    /// Current text of a cell, empty if blank.
    pub fn text_at(&self, cell_ref: &CellRef) -> String {
        self.grid
            .get(cell_ref)
            .map(|c| c.search_text())
            .unwrap_or_default()
    }

    /// All non-empty cells, sorted by row then column.
    pub fn cells_sorted(&self) -> Vec<(CellRef, Cell)> {
        let mut cells: Vec<(CellRef, Cell)> = self
            .grid
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        cells.sort_by(|a, b| a.0.row.cmp(&b.0.row).then(a.0.col.cmp(&b.0.col)));
        cells
    }

    /// Smallest rectangle holding every non-empty cell and merged region.
    pub fn used_range(&self) -> Option<Range> {
        let mut min_row = u32::MAX;
        let mut min_col = u32::MAX;
        let mut max_row = 0u32;
        let mut max_col = 0u32;

        for entry in self.grid.iter() {
            if entry.value().is_empty() {
                continue;
            }
            let cell_ref = entry.key();
            min_row = min_row.min(cell_ref.row);
            min_col = min_col.min(cell_ref.col);
            max_row = max_row.max(cell_ref.row);
            max_col = max_col.max(cell_ref.col);
        }

        for range in &self.merged {
            min_row = min_row.min(range.start.row);
            min_col = min_col.min(range.start.col);
            max_row = max_row.max(range.end.row);
            max_col = max_col.max(range.end.col);
        }

        (max_row > 0).then(|| {
            Range::new(
                CellRef::new(min_row, min_col),
                CellRef::new(max_row, max_col),
            )
        })
    }

    pub fn merged_region_at(&self, cell_ref: &CellRef) -> Option<&Range> {
        self.merged.iter().find(|r| r.contains(cell_ref))
    }

    /// True for cells inside a merged region other than its top-left cell.
    /// Only the top-left cell of a merge can be written.
    pub fn is_merged_child(&self, cell_ref: &CellRef) -> bool {
        self.merged_region_at(cell_ref)
            .is_some_and(|r| r.start != *cell_ref)
    }

    /// Write new contents into a cell. Formatting is kept; values cache
    /// themselves.
    pub fn write(&self, cell_ref: CellRef, contents: CellType) -> Result<(), String> {
        if self.is_merged_child(&cell_ref) {
            return Err(format!(
                "{}!{} is inside a merged region and cannot be written",
                self.name, cell_ref
            ));
        }
        self.set(cell_ref, Cell::from_value(contents));
        Ok(())
    }

    /// Remove content and formatting from every cell in `range`.
    ///
    /// Merged regions overlapping the range are unmerged, and shapes whose
    /// anchor cell lies inside it are deleted with it.
    pub fn clear_range(&mut self, range: &Range) -> ClearOutcome {
        let doomed: Vec<CellRef> = self
            .grid
            .iter()
            .filter(|entry| range.contains(entry.key()))
            .map(|entry| *entry.key())
            .collect();

        let mut outcome = ClearOutcome::default();
        for cell_ref in doomed {
            if let Some((_, cell)) = self.grid.remove(&cell_ref)
                && !cell.is_empty()
            {
                outcome.cells += 1;
            }
        }

        outcome.unmerged = self
            .merged
            .iter()
            .filter(|m| m.intersects(range))
            .copied()
            .collect();
        self.merged.retain(|m| !m.intersects(range));

        self.shapes.retain(|shape| {
            if range.contains(&shape.anchor()) {
                outcome.shapes_removed.push(shape.name.clone());
                false
            } else {
                true
            }
        });

        outcome
    }

    pub fn last_used_row(&self) -> Option<u32> {
        self.used_range().map(|r| r.end.row)
    }

    pub fn last_used_col(&self) -> Option<u32> {
        self.used_range().map(|r| r.end.col)
    }

    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }
}

/// Normalize a sheet name for case-insensitive lookup.
pub fn sheet_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MAX_COL;

    fn at(addr: &str) -> CellRef {
        CellRef::from_str(addr).unwrap()
    }

    #[test]
    fn test_used_range_spans_cells_and_merges() {
        let sheet = Sheet::new("PS");
        assert!(sheet.used_range().is_none());
        sheet.set(at("B2"), Cell::new_text("x"));
        sheet.set(at("D7"), Cell::new_number(3.0));
        let mut sheet = sheet;
        sheet.merged.push(Range::parse("E1:F2").unwrap());
        assert_eq!(sheet.used_range().unwrap().to_string(), "B1:F7");
    }

    #[test]
    fn test_merged_child_cannot_be_written() {
        let mut sheet = Sheet::new("PS");
        sheet.merged.push(Range::parse("A1:C1").unwrap());
        assert!(sheet.write(at("A1"), CellType::Text("Title".into())).is_ok());
        assert!(sheet.write(at("B1"), CellType::Text("nope".into())).is_err());
        assert!(sheet.get(&at("B1")).is_none());
    }

    #[test]
    fn test_clear_columns_unmerges_and_drops_anchored_shapes() {
        let mut sheet = Sheet::new("PS");
        sheet.set(at("A1"), Cell::new_text("keep"));
        sheet.set(at("L1"), Cell::new_text("gone"));
        sheet.set(at("M4"), Cell::new_number(1.0));
        sheet.merged.push(Range::parse("K2:M2").unwrap());
        sheet.merged.push(Range::parse("A3:B3").unwrap());
        sheet.shapes.push(Shape::new("Logo", 48.0 * 12.0, 0.0, 50.0, 50.0));
        sheet.shapes.push(Shape::new("Stamp", 0.0, 0.0, 50.0, 50.0));

        let outcome = sheet.clear_range(&Range::columns(12, MAX_COL));

        assert_eq!(outcome.cells, 2);
        assert_eq!(outcome.unmerged, vec![Range::parse("K2:M2").unwrap()]);
        assert_eq!(outcome.shapes_removed, vec!["Logo".to_string()]);
        assert_eq!(sheet.text_at(&at("A1")), "keep");
        assert!(sheet.get(&at("L1")).is_none());
        assert_eq!(sheet.merged.len(), 1);
        assert!(sheet.shape("Stamp").is_some());
    }

    #[test]
    fn test_sheet_key_folds_case() {
        assert_eq!(sheet_key("Cover"), sheet_key("COVER"));
    }

    #[test]
    fn test_sheet_key_keeps_whitespace() {
        assert_ne!(sheet_key(" PS "), sheet_key("PS"));
    }
}
