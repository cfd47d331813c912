use std::fmt;
use std::path::PathBuf;

use ps2rfp_engine::engine::Workbook;

use crate::rules::Rules;

/// Pipeline stages that can skip a cell or shape, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Freeze,
    Normalize,
    LocusClear,
    ShapeClear,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Freeze => "freeze",
            Stage::Normalize => "normalize",
            Stage::LocusClear => "locus clear",
            Stage::ShapeClear => "shape clear",
        };
        f.write_str(name)
    }
}

/// A per-cell or per-shape failure that was skipped instead of aborting.
#[derive(Clone, Debug, PartialEq)]
pub struct TransientCellFault {
    pub stage: Stage,
    pub sheet: String,
    /// Cell address or shape name.
    pub location: String,
    pub message: String,
}

impl fmt::Display for TransientCellFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}!{}: {}",
            self.stage, self.sheet, self.location, self.message
        )
    }
}

/// Summary of one sanitizer run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Name of the cover sheet that was deleted, if there was one.
    pub cover_deleted: Option<String>,
    /// Cells whose formula was replaced by its cached value.
    pub converted: usize,
    /// First column of the bulk clear on the target sheet.
    pub clear_start_col: u32,
    pub replaced: usize,
    pub canonicalized: usize,
    /// Cells emptied by the locus clears and the bulk clear together.
    pub cells_cleared: usize,
    pub shapes_restored: usize,
    pub output: PathBuf,
    pub warnings: Vec<TransientCellFault>,
}

/// A loaded workbook plus the rules being applied to it.
pub struct Document {
    pub workbook: Workbook,
    pub rules: Rules,
    /// Skipped failures, in the order they happened.
    pub faults: Vec<TransientCellFault>,
}

impl Document {
    pub fn new(workbook: Workbook, rules: Rules) -> Self {
        Document {
            workbook,
            rules,
            faults: Vec::new(),
        }
    }

    pub(crate) fn fault(&mut self, stage: Stage, sheet: &str, location: String, message: String) {
        log::warn!("{}!{}: {}", sheet, location, message);
        self.faults.push(TransientCellFault {
            stage,
            sheet: sheet.to_string(),
            location,
            message,
        });
    }
}
