use std::collections::HashMap;

use log::{debug, info, warn};
use ps2rfp_engine::engine::{
    CellRef, CellType, MAX_COL, Range, Shape, TextPattern, col_to_letters, column_left, find_all,
    find_next, row_top,
};

use super::{Document, Stage};
use crate::error::{Ps2RfpError, Result};

fn pattern(needle: &str) -> Result<TextPattern> {
    TextPattern::new(needle).map_err(Ps2RfpError::Config)
}

impl Document {
    /// Delete the cover sheet if the workbook has one.
    /// Returns the deleted sheet's name.
    pub fn delete_cover_sheet(&mut self) -> Option<String> {
        match self.workbook.remove_sheet(&self.rules.cover_sheet) {
            Some(sheet) => {
                info!("Deleted worksheet: {}", sheet.name);
                Some(sheet.name)
            }
            None => {
                info!("No '{}' worksheet found (skipping).", self.rules.cover_sheet);
                None
            }
        }
    }

    /// Replace every formula on every sheet with its cached value.
    ///
    /// Cells without a cached value keep their formula. Cells hidden inside
    /// a merged region are skipped. Returns the number of cells changed;
    /// running it twice changes nothing the second time.
    pub fn freeze_values(&mut self) -> usize {
        let mut converted = 0;
        for idx in 0..self.workbook.sheets().len() {
            let Some(sheet) = self.workbook.sheet(idx) else {
                continue;
            };
            let name = sheet.name.clone();
            let pending: Vec<(CellRef, CellType)> = sheet
                .cells_sorted()
                .into_iter()
                .filter(|(cell_ref, _)| !sheet.is_merged_child(cell_ref))
                .filter_map(|(cell_ref, cell)| match cell.cached_value {
                    Some(cached) if cached != cell.contents => Some((cell_ref, cached)),
                    _ => None,
                })
                .collect();

            for (cell_ref, value) in pending {
                match self.workbook.write(idx, cell_ref, value) {
                    Ok(()) => converted += 1,
                    Err(e) => self.fault(Stage::Freeze, &name, cell_ref.to_string(), e),
                }
            }
        }
        info!("Converted cells to values-only (updated {} cell(s)).", converted);
        converted
    }

    /// Position of the target sheet.
    pub fn target_sheet(&self) -> Result<usize> {
        self.workbook
            .position(&self.rules.target_sheet)
            .ok_or_else(|| Ps2RfpError::MissingRequiredSheet(self.rules.target_sheet.clone()))
    }

    /// First column of the bulk clear: the leftmost marker column plus the
    /// configured offset, or the default column when the marker is absent.
    ///
    /// Must run before `normalize_text` rewrites the marker.
    pub fn clear_start_column(&self, target: usize) -> Result<u32> {
        let sheet = self
            .workbook
            .sheet(target)
            .ok_or_else(|| Ps2RfpError::MissingRequiredSheet(self.rules.target_sheet.clone()))?;
        let marker = pattern(&self.rules.marker)?;
        let start = find_all(sheet, &marker)
            .iter()
            .map(|c| c.col.saturating_add(self.rules.clear_offset))
            .min();
        match start {
            Some(col) => {
                info!(
                    "'{}' found on '{}'; clearing from column {}.",
                    self.rules.marker,
                    sheet.name,
                    col_to_letters(col)
                );
                Ok(col)
            }
            None => {
                let col = self.rules.default_clear_start_col()?;
                info!(
                    "No '{}' on '{}'; clearing from column {}.",
                    self.rules.marker,
                    sheet.name,
                    col_to_letters(col)
                );
                Ok(col)
            }
        }
    }

    /// Replace the marker with its replacement in every text cell and in the
    /// text of formulas that are still live, then overwrite text cells
    /// mentioning both the replacement and the co-occurrence marker with the
    /// canonical text.
    ///
    /// Returns `(replaced, canonicalized)` cell counts.
    pub fn normalize_text(&mut self) -> Result<(usize, usize)> {
        let marker = pattern(&self.rules.marker)?;
        let replacement = pattern(&self.rules.replacement)?;
        let cooccurrence = pattern(&self.rules.cooccurrence_marker)?;

        let mut replaced = 0;
        let mut canonicalized = 0;
        for idx in 0..self.workbook.sheets().len() {
            let Some(sheet) = self.workbook.sheet(idx) else {
                continue;
            };
            let name = sheet.name.clone();
            let mut pending: Vec<(CellRef, CellType)> = Vec::new();
            for (cell_ref, cell) in sheet.cells_sorted() {
                let original = match &cell.contents {
                    CellType::Text(text) => text,
                    CellType::Formula(formula) => {
                        if let Some(rewritten) =
                            marker.replace_all(formula, &self.rules.replacement)
                        {
                            replaced += 1;
                            pending.push((cell_ref, CellType::Formula(rewritten)));
                        }
                        continue;
                    }
                    _ => continue,
                };
                let mut text = original.clone();
                if let Some(rewritten) = marker.replace_all(&text, &self.rules.replacement) {
                    text = rewritten;
                    replaced += 1;
                }
                if replacement.is_match(&text)
                    && cooccurrence.is_match(&text)
                    && text != self.rules.canonical_text
                {
                    text = self.rules.canonical_text.clone();
                    canonicalized += 1;
                }
                if &text != original {
                    pending.push((cell_ref, CellType::Text(text)));
                }
            }

            for (cell_ref, value) in pending {
                if let Err(e) = self.workbook.write(idx, cell_ref, value) {
                    self.fault(Stage::Normalize, &name, cell_ref.to_string(), e);
                }
            }
        }
        info!(
            "Replaced '{}' with '{}' in {} cell(s); {} cell(s) set to canonical text.",
            self.rules.marker, self.rules.replacement, replaced, canonicalized
        );
        Ok((replaced, canonicalized))
    }

    /// Clear the cell directly under the topmost replacement token in the
    /// workbook. Ties on row go to the earlier sheet, then the left column.
    /// Returns the number of cells emptied.
    pub fn clear_below_topmost_replacement(&mut self) -> Result<usize> {
        if !self.rules.clear_below_replacement {
            return Ok(0);
        }
        let replacement = pattern(&self.rules.replacement)?;
        let topmost = self
            .workbook
            .find_all(&replacement)
            .into_iter()
            .min_by_key(|m| (m.cell.row, m.sheet, m.cell.col));
        let Some(hit) = topmost else {
            warn!(
                "No '{}' found in workbook; skipping clear below it.",
                self.rules.replacement
            );
            return Ok(0);
        };
        let sheet_name = self
            .workbook
            .sheet(hit.sheet)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        let Some(below) = hit.cell.below(1) else {
            self.fault(
                Stage::LocusClear,
                &sheet_name,
                hit.cell.to_string(),
                "no row below the last row".to_string(),
            );
            return Ok(0);
        };
        let outcome = self
            .workbook
            .clear_range(hit.sheet, Range::new(below, below))
            .map_err(Ps2RfpError::InvalidInput)?;
        info!(
            "Cleared {}!{} below first '{}' at {}.",
            sheet_name, below, self.rules.replacement, hit.cell
        );
        Ok(outcome.cells)
    }

    /// Find the anchor cell's text again further down the target sheet and
    /// clear that column from just below the repeat to the last used row.
    /// Returns the number of cells emptied.
    pub fn clear_below_repeat_anchor(&mut self, target: usize) -> Result<usize> {
        let Some(anchor) = self.rules.repeat_anchor_cell()? else {
            return Ok(0);
        };
        let sheet = self
            .workbook
            .sheet(target)
            .ok_or_else(|| Ps2RfpError::MissingRequiredSheet(self.rules.target_sheet.clone()))?;
        let name = sheet.name.clone();
        let text = sheet.text_at(&anchor);
        if text.trim().is_empty() {
            info!("{}!{} is empty; skipping repeat clear.", name, anchor);
            return Ok(0);
        }
        let needle = pattern(&text)?;
        let Some(repeat) = find_next(sheet, &needle, anchor) else {
            info!(
                "'{}' from {}!{} does not repeat; skipping repeat clear.",
                text, name, anchor
            );
            return Ok(0);
        };
        let Some(last_row) = sheet.last_used_row() else {
            return Ok(0);
        };
        let first_row = repeat.row.saturating_add(self.rules.repeat_row_offset);
        if first_row > last_row {
            info!(
                "Nothing below {}!{} to clear (last used row {}).",
                name, repeat, last_row
            );
            return Ok(0);
        }
        let range = Range::new(
            CellRef::new(first_row, repeat.col),
            CellRef::new(last_row, repeat.col),
        );
        let outcome = self
            .workbook
            .clear_range(target, range)
            .map_err(Ps2RfpError::InvalidInput)?;
        info!(
            "Cleared {}!{} below repeat of '{}' ({} cell(s)).",
            name, range, text, outcome.cells
        );
        Ok(outcome.cells)
    }

    /// Clear every column from `start_col` to the last sheet column on the
    /// target sheet without losing its shapes.
    ///
    /// Shapes are parked in column A while the clear runs and then put back
    /// where they were, matched by name. Returns `(cells cleared, shapes
    /// restored)`.
    pub fn shape_preserving_clear(
        &mut self,
        target: usize,
        start_col: u32,
    ) -> Result<(usize, usize)> {
        if start_col > MAX_COL {
            info!(
                "Clear start column {} is past the last column; skipping clear.",
                start_col
            );
            return Ok((0, 0));
        }
        let spacing = self.rules.shape_spacing;
        let sheet = self
            .workbook
            .sheet_mut(target)
            .ok_or_else(|| Ps2RfpError::MissingRequiredSheet(self.rules.target_sheet.clone()))?;
        let name = sheet.name.clone();
        let snapshot: Vec<Shape> = sheet.shapes.clone();

        let mut skipped = Vec::new();
        let left = column_left(1);
        let mut top = row_top(1);
        for shape in sheet.shapes.iter_mut() {
            shape.locked = false;
            match shape.move_to(left, top) {
                Ok(()) => top += shape.geometry.height + spacing,
                Err(e) => skipped.push((shape.name.clone(), e)),
            }
        }
        if sheet.last_used_col().is_none_or(|col| col < start_col) {
            info!(
                "'{}' has no content at or beyond column {}.",
                name,
                col_to_letters(start_col)
            );
        }

        let range = Range::columns(start_col, MAX_COL);
        let outcome = self
            .workbook
            .clear_range(target, range)
            .map_err(Ps2RfpError::InvalidInput)?;
        if !outcome.unmerged.is_empty() {
            info!(
                "Unmerged {} merged range(s) intersecting columns {}+ on '{}'.",
                outcome.unmerged.len(),
                col_to_letters(start_col),
                name
            );
        }
        for shape in &outcome.shapes_removed {
            skipped.push((shape.clone(), "removed by the clear".to_string()));
        }

        // Later snapshots win when names repeat.
        let by_name: HashMap<&str, &Shape> =
            snapshot.iter().map(|s| (s.name.as_str(), s)).collect();
        let mut restored = 0;
        let mut seen = Vec::new();
        if let Some(sheet) = self.workbook.sheet_mut(target) {
            for shape in sheet.shapes.iter_mut() {
                let Some(original) = by_name.get(shape.name.as_str()) else {
                    continue;
                };
                seen.push(shape.name.clone());
                shape.locked = false;
                match shape.set_geometry(original.geometry) {
                    Ok(()) => restored += 1,
                    Err(e) => skipped.push((shape.name.clone(), e)),
                }
                shape.locked = original.locked;
            }
        }
        for original in &snapshot {
            if !seen.contains(&original.name)
                && !outcome.shapes_removed.contains(&original.name)
            {
                skipped.push((original.name.clone(), "shape no longer exists".to_string()));
            }
        }
        for (shape, message) in skipped {
            self.fault(Stage::ShapeClear, &name, shape, message);
        }

        info!(
            "Cleared values/styles from column {} to {} on '{}' ({} cell(s)); restored {} of {} shape(s).",
            col_to_letters(start_col),
            col_to_letters(MAX_COL),
            name,
            outcome.cells,
            restored,
            snapshot.len()
        );
        debug!("clear range {}", range);
        Ok((outcome.cells, restored))
    }
}
