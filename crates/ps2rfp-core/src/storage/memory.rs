//! In-memory store for exercising the pipeline without files.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use ps2rfp_engine::engine::Workbook;

use super::{SaveFormat, WorkbookStore};
use crate::error::{Ps2RfpError, Result};

/// A store that hands out one prepared workbook and keeps what is saved.
pub struct MemoryStore {
    source: RefCell<Option<Workbook>>,
    saved: RefCell<Option<(PathBuf, SaveFormat, Workbook)>>,
    fail_save: bool,
}

impl MemoryStore {
    pub fn new(workbook: Workbook) -> Self {
        MemoryStore {
            source: RefCell::new(Some(workbook)),
            saved: RefCell::new(None),
            fail_save: false,
        }
    }

    /// A store whose `save` always fails.
    pub fn failing_save(workbook: Workbook) -> Self {
        MemoryStore {
            fail_save: true,
            ..Self::new(workbook)
        }
    }

    /// Destination, format and content of the last save.
    pub fn saved(&self) -> Option<(PathBuf, SaveFormat, Workbook)> {
        self.saved.borrow().clone()
    }
}

impl WorkbookStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Workbook> {
        self.source.borrow_mut().take().ok_or_else(|| {
            Ps2RfpError::Load(format!("{}: workbook already loaded", path.display()))
        })
    }

    fn save(
        &self,
        workbook: &Workbook,
        _source: &Path,
        dest: &Path,
        format: SaveFormat,
    ) -> Result<()> {
        if self.fail_save {
            return Err(Ps2RfpError::Save(format!("{}: disk full", dest.display())));
        }
        *self.saved.borrow_mut() = Some((dest.to_path_buf(), format, workbook.clone()));
        Ok(())
    }
}
