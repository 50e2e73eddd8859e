//! Audit CLI command

use crate::error::SplitResult;
use crate::storage::Storage;

/// Handle `splitkro audit`, newest entries last
pub fn handle_audit_command(storage: &Storage, limit: usize) -> SplitResult<()> {
    let entries = storage.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("No audit entries yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    let total = storage.audit().entry_count()?;
    if total > entries.len() {
        println!("\nShowing {} of {} entries (use --limit to see more)", entries.len(), total);
    }

    Ok(())
}
