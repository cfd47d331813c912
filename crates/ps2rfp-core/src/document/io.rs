use std::path::Path;

use log::info;

use super::{Document, Report, output_path};
use crate::error::{Ps2RfpError, Result};
use crate::rules::Rules;
use crate::storage::{SaveFormat, WorkbookStore};

/// Check the input path and pick the save format from its extension.
fn check_input(input: &Path) -> Result<SaveFormat> {
    if !input.is_file() {
        return Err(Ps2RfpError::InvalidInput(format!(
            "File not found: {}",
            input.display()
        )));
    }
    SaveFormat::from_path(input).ok_or_else(|| {
        let ext = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Ps2RfpError::InvalidInput(format!("Expected .xlsx or .xlsm file. Got: {}", ext))
    })
}

/// Run the whole pipeline on `input` and save the renamed copy.
///
/// Nothing is written unless every stage succeeds. Per-cell and per-shape
/// failures are collected in the report instead of aborting.
pub fn sanitize(input: &Path, rules: &Rules, store: &dyn WorkbookStore) -> Result<Report> {
    rules.validate()?;
    let format = check_input(input)?;
    let output = output_path(input, rules)?;
    if output == input {
        return Err(Ps2RfpError::InvalidInput(format!(
            "Refusing to overwrite the input file: {}",
            input.display()
        )));
    }

    let workbook = store.load(input)?;
    let mut doc = Document::new(workbook, rules.clone());

    let cover_deleted = doc.delete_cover_sheet();
    let converted = doc.freeze_values();
    let target = doc.target_sheet()?;
    let clear_start_col = doc.clear_start_column(target)?;
    let (replaced, canonicalized) = doc.normalize_text()?;
    let mut cells_cleared = doc.clear_below_topmost_replacement()?;
    cells_cleared += doc.clear_below_repeat_anchor(target)?;
    let (bulk_cleared, shapes_restored) = doc.shape_preserving_clear(target, clear_start_col)?;
    cells_cleared += bulk_cleared;

    store.save(&doc.workbook, input, &output, format)?;
    info!("Wrote {} edit(s).", doc.workbook.journal().len());

    Ok(Report {
        cover_deleted,
        converted,
        clear_start_col,
        replaced,
        canonicalized,
        cells_cleared,
        shapes_restored,
        output,
        warnings: doc.faults,
    })
}
