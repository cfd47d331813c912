//! ps2rfp-core - Rules, sanitizer pipeline and workbook storage.

pub mod document;
pub mod error;
pub mod rules;
pub mod storage;

pub use document::{Document, Report, Stage, TransientCellFault, output_path, sanitize};
pub use error::{Ps2RfpError, Result};
pub use rules::Rules;
pub use storage::{MemoryStore, SaveFormat, WorkbookStore, XlsxStore};

pub use ps2rfp_engine::engine::CellRef;
