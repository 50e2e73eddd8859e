//! Simplify CLI command
//!
//! Runs the debt simplifier on a standalone balance file, without touching
//! stored groups. The file is a JSON array of
//! `{"memberId", "displayName", "netBalance"}` objects; `netBalance` may be a
//! number or a decimal string.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::display::{format_settlement_plan, format_unresolved};
use crate::error::{SplitError, SplitResult};
use crate::models::{balance_sum, checked_balance_add, BalanceEntry};
use crate::services::simplify::{simplify_with_options, SimplifyOptions};

/// Load a raw balance file
///
/// Entries sharing a `memberId` are merged by summing their balances; the
/// first display name wins. A merged balance past the accepted range is a
/// validation error.
pub fn load_balance_file(path: &Path) -> SplitResult<Vec<BalanceEntry<String>>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| SplitError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let raw: Vec<BalanceEntry<String>> = serde_json::from_str(&contents)
        .map_err(|e| SplitError::Json(format!("Invalid balance file {}: {}", path.display(), e)))?;

    let mut merged: Vec<BalanceEntry<String>> = Vec::with_capacity(raw.len());
    for entry in raw {
        match merged.iter_mut().find(|e| e.member_id == entry.member_id) {
            Some(existing) => {
                warn!(member = %entry.member_id, "duplicate member in balance file, merging");
                existing.net_balance = checked_balance_add(existing.net_balance, entry.net_balance)
                    .ok_or_else(|| {
                        SplitError::Validation(format!(
                            "Combined balance for {} is out of range",
                            entry.member_id
                        ))
                    })?;
            }
            None => merged.push(entry),
        }
    }

    debug!(
        entries = merged.len(),
        sum = ?balance_sum(&merged),
        "loaded balance file"
    );

    Ok(merged)
}

/// Handle `splitkro simplify <file>`
pub fn handle_simplify_command(settings: &Settings, file: &Path, json: bool) -> SplitResult<()> {
    let entries = load_balance_file(file)?;
    let outcome =
        simplify_with_options(&entries, SimplifyOptions::with_tolerance(settings.settle_tolerance()));

    if !outcome.is_fully_settled() {
        warn!(
            unresolved = outcome.unresolved.len(),
            "balances do not sum to zero"
        );
    }

    if json {
        let output = serde_json::to_string_pretty(&outcome.transactions)?;
        println!("{}", output);
    } else {
        let symbol = settings.currency_symbol.as_str();
        print!("{}", format_settlement_plan(&outcome.transactions, symbol));
        print!("{}", format_unresolved(&outcome.unresolved, symbol));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_load_merges_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.json");
        fs::write(
            &path,
            r#"[
                {"memberId": "a", "displayName": "Asha", "netBalance": 10},
                {"memberId": "b", "displayName": "Ravi", "netBalance": "-25.50"},
                {"memberId": "a", "displayName": "Asha again", "netBalance": 15.5}
            ]"#,
        )
        .unwrap();

        let entries = load_balance_file(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name, "Asha");
        assert_eq!(entries[0].net_balance, Decimal::new(2550, 2));
        assert_eq!(entries[1].net_balance, Decimal::new(-2550, 2));
    }

    #[test]
    fn test_merging_duplicates_past_the_limit_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.json");
        fs::write(
            &path,
            r#"[
                {"memberId": "a", "displayName": "Asha", "netBalance": 900000000000000},
                {"memberId": "a", "displayName": "Asha", "netBalance": 900000000000000}
            ]"#,
        )
        .unwrap();

        let err = load_balance_file(&path).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_load_rejects_oversized_balance() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.json");
        fs::write(
            &path,
            r#"[{"memberId": "a", "displayName": "Asha", "netBalance": 90000000000000000}]"#,
        )
        .unwrap();

        assert!(matches!(
            load_balance_file(&path).unwrap_err(),
            SplitError::Json(_)
        ));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.json");
        fs::write(&path, r#"{"memberId": "a"}"#).unwrap();

        let err = load_balance_file(&path).unwrap_err();
        assert!(matches!(err, SplitError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_balance_file(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SplitError::Io(_)));
    }
}
