//! Balance and settlement plan display

use rust_decimal::Decimal;

use crate::models::{BalanceEntry, Money, Transaction};
use crate::services::MemberBalance;

use super::column_width;

fn status(net: Money) -> &'static str {
    if net.is_positive() {
        "gets back"
    } else if net.is_negative() {
        "owes"
    } else {
        "settled"
    }
}

/// Format paid/owed/net per member as a table
pub fn format_balance_table(balances: &[MemberBalance], symbol: &str) -> String {
    if balances.is_empty() {
        return "No members in this group.\n".to_string();
    }

    let name_width = column_width("Member", balances.iter().map(|b| b.name.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:>12}  {}\n",
        "Member", "Paid", "Owed", "Net", "Status",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}  {:-<9}\n",
        "", "", "", "", "",
    ));

    for b in balances {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {:>12}  {}\n",
            b.name,
            b.paid.format_with_symbol(symbol),
            b.owed.format_with_symbol(symbol),
            b.net().format_with_symbol(symbol),
            status(b.net()),
        ));
    }

    output
}

/// Format a settlement plan, one "A pays B amount" line per payment
pub fn format_settlement_plan<Id>(plan: &[Transaction<Id>], symbol: &str) -> String {
    if plan.is_empty() {
        return "All settled up. No payments needed.\n".to_string();
    }

    let from_width = column_width("From", plan.iter().map(|t| t.from_display_name.as_str()));
    let to_width = column_width("To", plan.iter().map(|t| t.to_display_name.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<from_width$}       {:<to_width$}  {:>12}\n",
        "#", "From", "To", "Amount",
    ));
    output.push_str(&format!(
        "{:->3}  {:-<from_width$}       {:-<to_width$}  {:->12}\n",
        "", "", "", "",
    ));

    for (i, txn) in plan.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:<from_width$}  pays {:<to_width$}  {:>12}\n",
            i + 1,
            txn.from_display_name,
            txn.to_display_name,
            txn.amount.format_with_symbol(symbol),
        ));
    }

    let total: Money = plan.iter().map(|t| t.amount).sum();
    output.push_str(&format!(
        "\n{} payment(s), {} in total\n",
        plan.len(),
        total.format_with_symbol(symbol)
    ));

    output
}

/// Format an exact balance, to the cent when it fits
fn format_exact(value: Decimal, symbol: &str) -> String {
    match Money::from_decimal(value) {
        Some(money) => money.format_with_symbol(symbol),
        None => format!("{}{}", symbol, value),
    }
}

/// Format balances the simplifier could not match, if any
pub fn format_unresolved<Id>(unresolved: &[BalanceEntry<Id>], symbol: &str) -> String {
    if unresolved.is_empty() {
        return String::new();
    }

    let mut output = String::from("Warning: balances do not sum to zero; left unmatched:\n");
    for entry in unresolved {
        output.push_str(&format!(
            "  {}: {}\n",
            entry.display_name,
            format_exact(entry.net_balance, symbol)
        ));
    }
    output
}
