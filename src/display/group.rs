//! Group display formatting

use crate::models::{Group, Money};

use super::column_width;

/// Format groups as a table with member counts and total spend
pub fn format_group_list(groups: &[(Group, Money)], symbol: &str) -> String {
    if groups.is_empty() {
        return "No groups found. Create one with `splitkro group create <name>`.\n".to_string();
    }

    let name_width = column_width("Group", groups.iter().map(|(g, _)| g.name.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>12}  {}\n",
        "Group", "Members", "Spent", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:->12}  {:-<12}\n",
        "", "", "", "",
    ));

    for (group, spent) in groups {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:>12}  {}\n",
            group.name,
            group.members.len(),
            spent.format_with_symbol(symbol),
            group.id,
        ));
    }

    output
}

/// Format a single group's details
pub fn format_group_details(group: &Group, spent: Money, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:       {}\n", group.id));
    output.push_str(&format!("  Created:  {}\n", group.created_at.format("%Y-%m-%d")));
    output.push_str(&format!("  Spent:    {}\n", spent.format_with_symbol(symbol)));
    output.push_str(&format!("  Members:  {}\n", group.members.len()));

    for member in &group.members {
        output.push_str(&format!("    - {} ({})\n", member.name, member.id));
    }

    output
}
