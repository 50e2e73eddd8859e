//! Storage initialization
//!
//! Handles first-run setup: directories, empty ledger files and a default
//! `config.json`.

use crate::config::paths::SplitPaths;
use crate::config::settings::Settings;
use crate::error::SplitError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running this twice is harmless.
pub fn initialize_storage(paths: &SplitPaths) -> Result<(), SplitError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    let empty_files = [
        (paths.groups_file(), serde_json::json!({ "groups": [] })),
        (paths.expenses_file(), serde_json::json!({ "expenses": [] })),
        (
            paths.settlements_file(),
            serde_json::json!({ "settlements": [] }),
        ),
    ];

    for (path, empty) in empty_files {
        if !path.exists() {
            write_json_atomic(&path, &empty)?;
        }
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &SplitPaths) -> bool {
    !paths.is_initialized()
}
