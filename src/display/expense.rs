//! Expense ledger display

use crate::models::{Expense, Group, Money};

use super::{column_width, truncate};

/// Format a group's expenses as a ledger table
pub fn format_expense_list(
    group: &Group,
    expenses: &[Expense],
    symbol: &str,
    date_format: &str,
) -> String {
    if expenses.is_empty() {
        return format!("No expenses in {}.\n", group.name);
    }

    let payers: Vec<String> = expenses.iter().map(|e| group.member_name(e.paid_by)).collect();
    let payer_width = column_width("Paid by", payers.iter().map(String::as_str));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<24}  {:<payer_width$}  {:>12}  {}\n",
        "ID", "Date", "Description", "Paid by", "Amount", "Split",
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<24}  {:-<payer_width$}  {:->12}  {:-<10}\n",
        "", "", "", "", "", "",
    ));

    for (expense, payer) in expenses.iter().zip(&payers) {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<24}  {:<payer_width$}  {:>12}  {} ({})\n",
            expense.id.short(),
            expense.date.format(date_format),
            truncate(&expense.description, 24),
            payer,
            expense.amount.format_with_symbol(symbol),
            expense.split_type,
            expense.shares.len(),
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!(
        "\n{} expense(s), {} total\n",
        expenses.len(),
        total.format_with_symbol(symbol)
    ));

    output
}
