//! Export module for splitkro
//!
//! Exports a group in several formats:
//! - CSV: the suggested settlement plan, or the full ledger with one column
//!   per member (spreadsheet-compatible)
//! - JSON: machine-readable full group export
//! - YAML: human-readable full group export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_ledger_csv, export_plan_csv};
pub use json::{export_group_json, import_from_json, GroupExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_group_yaml, import_from_yaml};
