//! Business rules that drive the sanitizer.
//!
//! Every rule has a built-in default matching the PS workbooks the tool was
//! written for. A `rules.toml` file can override any subset of them:
//!
//! ```toml
//! marker = "DDP"
//! replacement = "CIF"
//! clear_offset = 3
//! default_clear_start = "L"
//! repeat_anchor = "B3"
//! ```

use std::path::Path;

use ps2rfp_engine::engine::{CellRef, letters_to_col};
use serde::Deserialize;

use crate::error::{Ps2RfpError, Result};

const MAX_RULES_FILE_BYTES: u64 = 65_536;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Sheet deleted before anything else (matched ignoring case).
    pub cover_sheet: String,
    /// Sheet whose right-hand columns are cleared (matched ignoring case).
    pub target_sheet: String,
    /// Trade term replaced throughout the workbook.
    pub marker: String,
    /// Text the marker is replaced with.
    pub replacement: String,
    /// Columns to the right of the leftmost marker where clearing starts.
    pub clear_offset: u32,
    /// Column letters where clearing starts when no marker is found.
    pub default_clear_start: String,
    /// A cell holding both the replacement and this text is overwritten
    /// with `canonical_text`.
    pub cooccurrence_marker: String,
    pub canonical_text: String,
    /// Clear the cell under the topmost replacement occurrence.
    pub clear_below_replacement: bool,
    /// Cell on the target sheet whose text is looked up again further down;
    /// the column below that repeat is cleared. Empty disables the clear.
    pub repeat_anchor: Option<String>,
    /// Rows below the repeated text where that clear starts.
    pub repeat_row_offset: u32,
    /// Filename token after the date prefix, and what it becomes.
    pub name_from: String,
    pub name_to: String,
    /// Vertical gap, in points, between shapes parked in column A.
    pub shape_spacing: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            cover_sheet: "COVER".to_string(),
            target_sheet: "PS".to_string(),
            marker: "DDP".to_string(),
            replacement: "CIF".to_string(),
            clear_offset: 3,
            default_clear_start: "L".to_string(),
            cooccurrence_marker: "DELIVERED".to_string(),
            canonical_text: "PRICE TERM: CIF (COST, INSURANCE AND FREIGHT)".to_string(),
            clear_below_replacement: true,
            repeat_anchor: Some("B3".to_string()),
            repeat_row_offset: 1,
            name_from: "PS".to_string(),
            name_to: "RFP".to_string(),
            shape_spacing: 10.0,
        }
    }
}

impl Rules {
    /// Parse and validate rules from TOML text. Missing keys keep defaults.
    pub fn from_toml(text: &str) -> Result<Rules> {
        let rules: Rules =
            toml::from_str(text).map_err(|e| Ps2RfpError::Config(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a TOML file.
    pub fn load(path: &Path) -> Result<Rules> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_RULES_FILE_BYTES {
            return Err(Ps2RfpError::Config(format!(
                "Refusing to read {}: rules file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_RULES_FILE_BYTES
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| match e {
            Ps2RfpError::Config(msg) => {
                Ps2RfpError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("cover_sheet", &self.cover_sheet),
            ("target_sheet", &self.target_sheet),
            ("marker", &self.marker),
            ("replacement", &self.replacement),
            ("cooccurrence_marker", &self.cooccurrence_marker),
            ("name_from", &self.name_from),
            ("name_to", &self.name_to),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Ps2RfpError::Config(format!("'{}' must not be empty", key)));
            }
        }
        self.default_clear_start_col()?;
        self.repeat_anchor_cell()?;
        if !self.shape_spacing.is_finite() || self.shape_spacing < 0.0 {
            return Err(Ps2RfpError::Config(
                "'shape_spacing' must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// `default_clear_start` as a 1-based column index.
    pub fn default_clear_start_col(&self) -> Result<u32> {
        letters_to_col(self.default_clear_start.trim()).ok_or_else(|| {
            Ps2RfpError::Config(format!(
                "'default_clear_start' is not a column: {}",
                self.default_clear_start
            ))
        })
    }

    pub fn repeat_anchor_cell(&self) -> Result<Option<CellRef>> {
        match self.repeat_anchor.as_deref() {
            None => Ok(None),
            Some(addr) if addr.trim().is_empty() => Ok(None),
            Some(addr) => CellRef::from_str(addr).map(Some).ok_or_else(|| {
                Ps2RfpError::Config(format!("'repeat_anchor' is not a cell: {}", addr))
            }),
        }
    }
}
