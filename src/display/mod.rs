//! Display formatting for terminal output
//!
//! Formats groups, balances, settlement plans and ledgers as aligned plain
//! text tables. Every function returns a `String`; printing is left to the
//! CLI layer.

pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;

pub use balance::{format_balance_table, format_settlement_plan, format_unresolved};
pub use expense::format_expense_list;
pub use group::{format_group_details, format_group_list};
pub use settlement::format_settlement_history;

/// Width of the widest value in a column, never narrower than its header
fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

/// Truncate a string to `max` characters, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
