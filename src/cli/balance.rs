//! Balance CLI command
//!
//! Shows each member's paid/owed/net position and the payments that would
//! settle the group.

use crate::config::settings::Settings;
use crate::display::{format_balance_table, format_settlement_plan, format_unresolved};
use crate::error::SplitResult;
use crate::services::{BalanceService, GroupService};
use crate::storage::Storage;

/// Handle `splitkro balance <group>`
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    group: &str,
) -> SplitResult<()> {
    let group = GroupService::new(storage).resolve(group)?;
    let service = BalanceService::new(storage).with_tolerance(settings.settle_tolerance());
    let symbol = settings.currency_symbol.as_str();

    let balances = service.member_balances(group.id)?;
    let outcome = service.suggested_settlements(group.id)?;
    let total = service.group_total(group.id)?;

    println!("{} (total spent: {})", group.name, total.format_with_symbol(symbol));
    println!();
    print!("{}", format_balance_table(&balances, symbol));
    println!();
    println!("Suggested settlements:");
    print!("{}", format_settlement_plan(&outcome.transactions, symbol));
    print!("{}", format_unresolved(&outcome.unresolved, symbol));

    Ok(())
}
