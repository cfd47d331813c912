//! Error types for the sanitizer.

use thiserror::Error;

/// Errors that abort a sanitizer run. Per-cell and per-shape problems are
/// not errors; they are collected as [`crate::TransientCellFault`]s.
#[derive(Error, Debug)]
pub enum Ps2RfpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("'{0}' worksheet not found.")]
    MissingRequiredSheet(String),

    #[error("Failed to open workbook: {0}")]
    Load(String),

    #[error("Failed to save workbook: {0}")]
    Save(String),

    #[error("Invalid rules: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Ps2RfpError>;
