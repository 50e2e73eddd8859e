//! JSON export
//!
//! Exports one group with its full ledger, current balances and the suggested
//! settlement plan, with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SplitError, SplitResult};
use crate::models::{BalanceEntry, Expense, Group, GroupId, Money, Settlement, Transaction};
use crate::services::balance::compute_balances;
use crate::services::simplify::{simplify_with_options, SimplifyOptions};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full group export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub group: Group,

    pub expenses: Vec<Expense>,

    pub settlements: Vec<Settlement>,

    /// Net balance per member at export time
    pub balances: Vec<BalanceEntry>,

    /// Suggested payments at export time
    pub plan: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub member_count: usize,

    pub expense_count: usize,

    pub settlement_count: usize,

    /// Total of all expenses
    pub total_spent: Money,

    pub earliest_expense: Option<String>,

    pub latest_expense: Option<String>,
}

impl GroupExport {
    /// Build an export of one group from storage
    pub fn from_storage(
        storage: &Storage,
        group_id: GroupId,
        options: SimplifyOptions,
    ) -> SplitResult<Self> {
        let group = storage
            .groups
            .get(group_id)?
            .ok_or_else(|| SplitError::group_not_found(group_id.to_string()))?;
        let expenses = storage.expenses.get_by_group(group_id)?;
        let settlements = storage.settlements.get_by_group(group_id)?;

        let balances = compute_balances(&group, &expenses, &settlements);
        let plan = simplify_with_options(&balances, options).transactions;

        let metadata = ExportMetadata {
            member_count: group.members.len(),
            expense_count: expenses.len(),
            settlement_count: settlements.len(),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            group,
            expenses,
            settlements,
            balances,
            plan,
            metadata,
        })
    }

    /// Check schema version and that the ledger only references group members
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let member_ids: HashSet<_> = self.group.members.iter().map(|m| m.id).collect();

        for expense in &self.expenses {
            if expense.group_id != self.group.id {
                return Err(format!(
                    "Expense {} belongs to another group",
                    expense.id
                ));
            }
            if !member_ids.contains(&expense.paid_by) {
                return Err(format!(
                    "Expense {} references unknown payer {}",
                    expense.id, expense.paid_by
                ));
            }
            if let Some(share) = expense
                .shares
                .iter()
                .find(|s| !member_ids.contains(&s.member_id))
            {
                return Err(format!(
                    "Expense {} references unknown member {}",
                    expense.id, share.member_id
                ));
            }
            expense
                .validate()
                .map_err(|e| format!("Expense {}: {}", expense.id, e))?;
        }

        for settlement in &self.settlements {
            if !member_ids.contains(&settlement.from) || !member_ids.contains(&settlement.to) {
                return Err(format!(
                    "Settlement {} references an unknown member",
                    settlement.id
                ));
            }
        }

        Ok(())
    }
}

/// Export one group to JSON
pub fn export_group_json<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    options: SimplifyOptions,
    writer: &mut W,
    pretty: bool,
) -> SplitResult<()> {
    let export = GroupExport::from_storage(storage, group_id, options)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON group export
pub fn import_from_json(json_str: &str) -> SplitResult<GroupExport> {
    let export: GroupExport = serde_json::from_str(json_str)?;
    export.validate().map_err(SplitError::Validation)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::models::{Member, Share, SplitType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seeded_group(storage: &Storage) -> Group {
        let mut group = Group::new("Trip");
        group.add_member(Member::new("Asha")).unwrap();
        group.add_member(Member::new("Ravi")).unwrap();
        let (asha, ravi) = (group.members[0].id, group.members[1].id);
        storage.groups.upsert(group.clone()).unwrap();
        storage
            .expenses
            .upsert(Expense::new(
                group.id,
                "Fuel",
                Money::from_cents(4000),
                asha,
                SplitType::Equal,
                vec![
                    Share::new(asha, Money::from_cents(2000)),
                    Share::new(ravi, Money::from_cents(2000)),
                ],
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            ))
            .unwrap();
        group
    }

    #[test]
    fn test_group_export() {
        let (_temp_dir, storage) = create_test_storage();
        let group = seeded_group(&storage);

        let export =
            GroupExport::from_storage(&storage, group.id, SimplifyOptions::default()).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.metadata.total_spent, Money::from_cents(4000));
        assert_eq!(export.plan.len(), 1);
        assert_eq!(export.plan[0].amount, Money::from_cents(2000));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_export_and_import() {
        let (_temp_dir, storage) = create_test_storage();
        let group = seeded_group(&storage);

        let mut output = Vec::new();
        export_group_json(
            &storage,
            group.id,
            SimplifyOptions::default(),
            &mut output,
            true,
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"netBalance\": 20.0"));

        let imported = import_from_json(&text).unwrap();
        assert_eq!(imported.group.id, group.id);
        assert_eq!(imported.expenses.len(), 1);
    }

    #[test]
    fn test_import_rejects_foreign_member() {
        let (_temp_dir, storage) = create_test_storage();
        let group = seeded_group(&storage);

        let mut export =
            GroupExport::from_storage(&storage, group.id, SimplifyOptions::default()).unwrap();
        export.group.members.pop();

        let text = serde_json::to_string(&export).unwrap();
        assert!(import_from_json(&text).unwrap_err().is_validation());
    }
}
