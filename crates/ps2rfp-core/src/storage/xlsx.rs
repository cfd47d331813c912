//! OOXML workbooks through `umya-spreadsheet`.
//!
//! Loading builds the in-memory model from cell values, cached formula
//! results and merged regions. Saving re-reads the source file and replays
//! the workbook journal onto it, so styles, drawings and VBA projects the
//! model never saw are written back unchanged. A source whose VBA project
//! does not match the requested save format is refused.

use std::path::Path;

use log::debug;
use ps2rfp_engine::engine::{Cell, CellRef, CellType, Edit, Range, Sheet, Workbook};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use super::{SaveFormat, WorkbookStore};
use crate::error::{Ps2RfpError, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxStore;

impl XlsxStore {
    pub fn new() -> Self {
        XlsxStore
    }
}

fn read_book(path: &Path) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| Ps2RfpError::Load(format!("{}: {}", path.display(), e)))
}

/// Stored value of a cell, or the cached result of a formula, typed by the
/// cell's data type rather than by how the text looks.
fn typed_value(cell: &umya_spreadsheet::Cell) -> CellType {
    let value = cell.get_value();
    if value.is_empty() {
        return CellType::Empty;
    }
    match cell.get_data_type() {
        "s" | "str" | "inlineStr" => CellType::Text(value.to_string()),
        "b" => CellType::Bool(value.eq_ignore_ascii_case("TRUE") || value == "1"),
        "e" => CellType::Error(value.to_string()),
        _ => CellType::from_raw(&value),
    }
}

fn load_sheet(ws: &Worksheet) -> Sheet {
    let mut sheet = Sheet::new(ws.get_name());
    for cell in ws.get_cell_collection() {
        let col = *cell.get_coordinate().get_col_num();
        let row = *cell.get_coordinate().get_row_num();
        let loaded = if cell.is_formula() {
            Cell::new_formula(cell.get_formula(), Some(typed_value(cell)))
        } else {
            Cell::from_value(typed_value(cell))
        };
        sheet.set(CellRef::new(row, col), loaded);
    }
    for merge in ws.get_merge_cells() {
        match Range::parse(&merge.get_range()) {
            Some(range) => sheet.merged.push(range),
            None => debug!(
                "{}: ignoring unreadable merge '{}'",
                ws.get_name(),
                merge.get_range()
            ),
        }
    }
    sheet
}

fn sheet_mut<'a>(book: &'a mut Spreadsheet, name: &str) -> Result<&'a mut Worksheet> {
    book.get_sheet_by_name_mut(name)
        .ok_or_else(|| Ps2RfpError::Save(format!("sheet '{}' not found while saving", name)))
}

fn apply_edit(book: &mut Spreadsheet, edit: &Edit) -> Result<()> {
    match edit {
        Edit::RemoveSheet { sheet } => {
            debug!("replay: remove sheet '{}'", sheet);
            book.remove_sheet_by_name(sheet).map_err(|e| {
                Ps2RfpError::Save(format!("failed to delete sheet '{}': {}", sheet, e))
            })?;
        }
        Edit::SetValue { sheet, cell, value } => {
            let ws = sheet_mut(book, sheet)?;
            let target = ws.get_cell_mut((cell.col, cell.row));
            match value {
                CellType::Empty => {
                    target.set_value(String::new());
                }
                CellType::Text(text) => {
                    target.set_value_string(text.clone());
                }
                CellType::Number(n) => {
                    target.set_value_number(*n);
                }
                CellType::Bool(b) => {
                    target.set_value_bool(*b);
                }
                CellType::Error(e) => {
                    target.set_value(e.clone());
                }
                CellType::Formula(f) => {
                    target.set_formula(f.clone());
                }
            }
        }
        Edit::ClearRange { sheet, range } => {
            debug!("replay: clear {}!{}", sheet, range);
            let ws = sheet_mut(book, sheet)?;
            let doomed: Vec<(u32, u32)> = ws
                .get_cell_collection()
                .iter()
                .map(|c| {
                    (
                        *c.get_coordinate().get_col_num(),
                        *c.get_coordinate().get_row_num(),
                    )
                })
                .filter(|&(col, row)| range.contains(&CellRef::new(row, col)))
                .collect();
            for coordinate in doomed {
                ws.remove_cell(coordinate);
            }
            ws.get_merge_cells_mut().retain(|m| {
                Range::parse(&m.get_range()).is_none_or(|merged| !merged.intersects(range))
            });
        }
    }
    Ok(())
}

impl WorkbookStore for XlsxStore {
    fn load(&self, path: &Path) -> Result<Workbook> {
        let book = read_book(path)?;
        let mut workbook = Workbook::new();
        for ws in book.get_sheet_collection_no_check() {
            workbook
                .push_sheet(load_sheet(ws))
                .map_err(|e| Ps2RfpError::Load(format!("{}: {}", path.display(), e)))?;
        }
        debug!(
            "loaded {} sheet(s) from {}",
            workbook.sheets().len(),
            path.display()
        );
        Ok(workbook)
    }

    fn save(
        &self,
        workbook: &Workbook,
        source: &Path,
        dest: &Path,
        format: SaveFormat,
    ) -> Result<()> {
        let mut book = read_book(source)?;
        let has_macros = book.get_has_macros();
        if has_macros != format.keeps_macros() {
            let kind = if has_macros {
                "carries a VBA project"
            } else {
                "has no VBA project"
            };
            return Err(Ps2RfpError::Save(format!(
                "{} {} and cannot be written as {}",
                source.display(),
                kind,
                dest.display()
            )));
        }
        for edit in workbook.journal() {
            apply_edit(&mut book, edit)?;
        }
        debug!(
            "writing {} edit(s) to {} as {:?}",
            workbook.journal().len(),
            dest.display(),
            format
        );
        umya_spreadsheet::writer::xlsx::write(&book, dest)
            .map_err(|e| Ps2RfpError::Save(format!("{}: {}", dest.display(), e)))
    }
}
