//! ps2rfp_engine - In-memory workbook model and search.

pub mod engine;
