//! Workbook storage: loading files into the model and writing results.

mod memory;
mod xlsx;

pub use memory::MemoryStore;
pub use xlsx::XlsxStore;

use crate::error::Result;
use ps2rfp_engine::engine::Workbook;
use std::path::Path;

/// Container format of a saved workbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    /// `.xlsx`
    Workbook,
    /// `.xlsm`, macros kept.
    MacroWorkbook,
}

impl SaveFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<SaveFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(SaveFormat::Workbook),
            "xlsm" => Some(SaveFormat::MacroWorkbook),
            _ => None,
        }
    }

    pub fn keeps_macros(&self) -> bool {
        matches!(self, SaveFormat::MacroWorkbook)
    }
}

/// Reads workbooks into the in-memory model and writes edited ones out.
pub trait WorkbookStore {
    fn load(&self, path: &Path) -> Result<Workbook>;

    /// Write `workbook` to `dest`. `source` is the file it was loaded from,
    /// which must be left untouched.
    fn save(&self, workbook: &Workbook, source: &Path, dest: &Path, format: SaveFormat)
    -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::SaveFormat;
    use std::path::Path;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SaveFormat::from_path(Path::new("a/250826 PS-X.XLSM")),
            Some(SaveFormat::MacroWorkbook)
        );
        assert_eq!(
            SaveFormat::from_path(Path::new("b.xlsx")),
            Some(SaveFormat::Workbook)
        );
        assert_eq!(SaveFormat::from_path(Path::new("c.xls")), None);
        assert_eq!(SaveFormat::from_path(Path::new("noext")), None);
    }
}
