//! YAML export
//!
//! Same content as the JSON export, for a human-readable archive.

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::export::json::GroupExport;
use crate::models::GroupId;
use crate::services::simplify::SimplifyOptions;
use crate::storage::Storage;

/// Export one group to YAML
pub fn export_group_yaml<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    options: SimplifyOptions,
    writer: &mut W,
) -> SplitResult<()> {
    let export = GroupExport::from_storage(storage, group_id, options)?;

    writeln!(writer, "# splitkro group export: {}", export.group.name)
        .map_err(|e| SplitError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| SplitError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| SplitError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SplitError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML group export
pub fn import_from_yaml(yaml_str: &str) -> SplitResult<GroupExport> {
    let export: GroupExport = serde_yaml::from_str(yaml_str)?;
    export.validate().map_err(SplitError::Validation)?;
    Ok(export)
}
