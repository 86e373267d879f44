//! Export functionality for simulation data.
//!
//! Provides CSV time-series export and JSON state export.

mod csv_export;
mod json_export;

pub use csv_export::{CsvExporter, TimeSeriesRecord};
pub use json_export::{export_state_json, export_state_json_to, StateExport};
