//! The sanitizing pipeline over an in-memory workbook.

mod io;
mod naming;
mod ops;
mod state;

pub use io::sanitize;
pub use naming::output_path;
pub use state::{Document, Report, Stage, TransientCellFault};
