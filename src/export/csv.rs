//! CSV export
//!
//! The ledger export has one share column per member. Settlement rows put the
//! amount in the receiver's column, so for every member
//! `sum(Amount where Paid By = member) - sum(member column)` is their net
//! balance.

use std::fmt::Display;
use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::models::{GroupId, Transaction};
use crate::storage::Storage;

/// Export a settlement plan: one row per payment, in plan order
pub fn export_plan_csv<Id: Display, W: Write>(
    plan: &[Transaction<Id>],
    writer: &mut W,
) -> SplitResult<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(["Step", "From", "From ID", "To", "To ID", "Amount"])?;

    for (i, txn) in plan.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            txn.from_display_name.clone(),
            txn.from_member_id.to_string(),
            txn.to_display_name.clone(),
            txn.to_member_id.to_string(),
            txn.amount.to_decimal_string(),
        ])?;
    }

    wtr.flush()
        .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Export a group's expenses and settlements with per-member shares
pub fn export_ledger_csv<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
) -> SplitResult<()> {
    let group = storage
        .groups
        .get(group_id)?
        .ok_or_else(|| SplitError::group_not_found(group_id.to_string()))?;
    let expenses = storage.expenses.get_by_group(group_id)?;
    let settlements = storage.settlements.get_by_group(group_id)?;

    let mut wtr = ::csv::Writer::from_writer(writer);

    let mut header = vec![
        "ID".to_string(),
        "Date".to_string(),
        "Description".to_string(),
        "Paid By".to_string(),
        "Amount".to_string(),
        "Split".to_string(),
    ];
    header.extend(group.members.iter().map(|m| m.name.clone()));
    wtr.write_record(&header)?;

    for expense in &expenses {
        let mut record = vec![
            expense.id.to_string(),
            expense.date.to_string(),
            expense.description.clone(),
            group.member_name(expense.paid_by),
            expense.amount.to_decimal_string(),
            expense.split_type.to_string().to_lowercase(),
        ];
        record.extend(group.members.iter().map(|m| {
            if expense.shares.iter().any(|s| s.member_id == m.id) {
                expense.share_of(m.id).to_decimal_string()
            } else {
                String::new()
            }
        }));
        wtr.write_record(&record)?;
    }

    for settlement in &settlements {
        let mut record = vec![
            settlement.id.to_string(),
            settlement.date.to_string(),
            format!(
                "Settlement: {} -> {}",
                group.member_name(settlement.from),
                group.member_name(settlement.to)
            ),
            group.member_name(settlement.from),
            settlement.amount.to_decimal_string(),
            "settlement".to_string(),
        ];
        record.extend(group.members.iter().map(|m| {
            if m.id == settlement.to {
                settlement.amount.to_decimal_string()
            } else {
                String::new()
            }
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()
        .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}
