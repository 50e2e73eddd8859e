//! Settlement history display

use crate::models::{Group, Settlement};

use super::column_width;

/// Format recorded settlements, marking payments that differ from a suggestion
pub fn format_settlement_history(
    group: &Group,
    settlements: &[Settlement],
    symbol: &str,
    date_format: &str,
) -> String {
    if settlements.is_empty() {
        return format!("No settlements recorded in {}.\n", group.name);
    }

    let rows: Vec<(String, String)> = settlements
        .iter()
        .map(|s| (group.member_name(s.from), group.member_name(s.to)))
        .collect();
    let from_width = column_width("From", rows.iter().map(|(f, _)| f.as_str()));
    let to_width = column_width("To", rows.iter().map(|(_, t)| t.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<from_width$}  {:<to_width$}  {:>12}  {}\n",
        "ID", "Date", "From", "To", "Amount", "Note",
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<from_width$}  {:-<to_width$}  {:->12}  {:-<8}\n",
        "", "", "", "", "", "",
    ));

    for (settlement, (from, to)) in settlements.iter().zip(&rows) {
        let note = match settlement.suggested_amount {
            Some(suggested) if settlement.is_partial() => {
                format!("partial of {}", suggested.format_with_symbol(symbol))
            }
            Some(_) => "suggested".to_string(),
            None => settlement.memo.clone(),
        };

        output.push_str(&format!(
            "{:<12}  {:<10}  {:<from_width$}  {:<to_width$}  {:>12}  {}\n",
            settlement.id.short(),
            settlement.date.format(date_format),
            from,
            to,
            settlement.amount.format_with_symbol(symbol),
            note,
        ));
    }

    output
}
