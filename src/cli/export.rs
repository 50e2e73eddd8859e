//! CLI commands for group export and import
//!
//! Writes one group to a file as CSV, JSON or YAML, and reads a JSON or YAML
//! export back into storage.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::export::{csv, json, yaml};
use crate::services::{BalanceService, GroupService, SimplifyOptions};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV (ledger, or the settlement plan with --plan)
    Csv,
    /// JSON (full group)
    Json,
    /// YAML (full group, human-readable)
    Yaml,
}

/// Handle `splitkro export`
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    group: &str,
    output: &Path,
    format: ExportFormat,
    plan_only: bool,
) -> SplitResult<()> {
    let group = GroupService::new(storage).resolve(group)?;
    let options = SimplifyOptions::with_tolerance(settings.settle_tolerance());

    let file = File::create(output).map_err(|e| {
        SplitError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv if plan_only => {
            let outcome = BalanceService::new(storage)
                .with_tolerance(settings.settle_tolerance())
                .suggested_settlements(group.id)?;
            csv::export_plan_csv(&outcome.transactions, &mut writer)?;
            println!("Settlement plan exported to: {}", output.display());
        }
        ExportFormat::Csv => {
            csv::export_ledger_csv(storage, group.id, &mut writer)?;
            println!("Ledger exported to: {}", output.display());
        }
        ExportFormat::Json => {
            json::export_group_json(storage, group.id, options, &mut writer, true)?;
            println!("Group exported to: {}", output.display());
        }
        ExportFormat::Yaml => {
            yaml::export_group_yaml(storage, group.id, options, &mut writer)?;
            println!("Group exported to: {}", output.display());
        }
    }

    if plan_only && !matches!(format, ExportFormat::Csv) {
        println!("Note: --plan only applies to CSV; JSON and YAML always include the plan.");
    }

    writer
        .flush()
        .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Handle `splitkro import`
///
/// The format defaults to YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn handle_import_command(
    storage: &Storage,
    input: &Path,
    format: Option<ExportFormat>,
) -> SplitResult<()> {
    let format = format.unwrap_or_else(|| match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            ExportFormat::Yaml
        }
        _ => ExportFormat::Json,
    });

    let text = fs::read_to_string(input).map_err(|e| {
        SplitError::Import(format!("Failed to read {}: {}", input.display(), e))
    })?;

    let export = match format {
        ExportFormat::Json => json::import_from_json(&text)?,
        ExportFormat::Yaml => yaml::import_from_yaml(&text)?,
        ExportFormat::Csv => {
            return Err(SplitError::Validation(
                "CSV exports cannot be imported; use a JSON or YAML export".into(),
            ))
        }
    };

    let expense_count = export.expenses.len();
    let settlement_count = export.settlements.len();
    let group =
        GroupService::new(storage).import(export.group, export.expenses, export.settlements)?;

    println!(
        "Imported group: {} ({} expense(s), {} settlement(s))",
        group.name, expense_count, settlement_count
    );

    Ok(())
}
