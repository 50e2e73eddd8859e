//! Group CLI commands
//!
//! Implements CLI commands for group and member management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_group_details, format_group_list};
use crate::error::SplitResult;
use crate::services::{BalanceService, GroupService};
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Initial members, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        members: Vec<String>,
    },
    /// List all groups
    List,
    /// Show group details and members
    Show {
        /// Group name or ID
        group: String,
    },
    /// Add a member to a group
    AddMember {
        /// Group name or ID
        group: String,
        /// Member name
        name: String,
    },
    /// Remove a member with no expenses and a zero balance
    RemoveMember {
        /// Group name or ID
        group: String,
        /// Member name or ID
        member: String,
    },
    /// Rename a group
    Rename {
        /// Group name or ID
        group: String,
        /// New name
        name: String,
    },
    /// Delete a group with all its expenses and settlements
    Delete {
        /// Group name or ID
        group: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a group command
pub fn handle_group_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GroupCommands,
) -> SplitResult<()> {
    let service = GroupService::new(storage);
    let balances = BalanceService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GroupCommands::Create { name, members } => {
            let group = service.create(&name, &members)?;
            println!("Created group: {} ({})", group.name, group.id);
            if !group.members.is_empty() {
                let names: Vec<_> = group.members.iter().map(|m| m.name.as_str()).collect();
                println!("  Members: {}", names.join(", "));
            }
        }

        GroupCommands::List => {
            let rows = service
                .list()?
                .into_iter()
                .map(|g| {
                    let spent = balances.group_total(g.id)?;
                    Ok((g, spent))
                })
                .collect::<SplitResult<Vec<_>>>()?;
            print!("{}", format_group_list(&rows, symbol));
        }

        GroupCommands::Show { group } => {
            let group = service.resolve(&group)?;
            let spent = balances.group_total(group.id)?;
            print!("{}", format_group_details(&group, spent, symbol));
        }

        GroupCommands::AddMember { group, name } => {
            let group = service.resolve(&group)?;
            let member = service.add_member(group.id, &name)?;
            println!("Added {} to {} ({})", member.name, group.name, member.id);
        }

        GroupCommands::RemoveMember { group, member } => {
            let group = service.resolve(&group)?;
            let member = service.resolve_member(&group, &member)?;
            service.remove_member(group.id, member.id)?;
            println!("Removed {} from {}", member.name, group.name);
        }

        GroupCommands::Rename { group, name } => {
            let group = service.resolve(&group)?;
            let old_name = group.name.clone();
            let renamed = service.rename(group.id, &name)?;
            println!("Renamed group: {} -> {}", old_name, renamed.name);
        }

        GroupCommands::Delete { group, force } => {
            let group = service.resolve(&group)?;

            if !force {
                let expenses = storage.expenses.get_by_group(group.id)?.len();
                let settlements = storage.settlements.get_by_group(group.id)?.len();
                println!(
                    "This will delete '{}' with {} expense(s) and {} settlement(s).",
                    group.name, expenses, settlements
                );
                println!("Run again with --force to confirm.");
                return Ok(());
            }

            let deleted = service.delete(group.id)?;
            println!(
                "Deleted group: {} ({} expense(s), {} settlement(s) removed)",
                deleted.group.name, deleted.expenses_removed, deleted.settlements_removed
            );
        }
    }

    Ok(())
}
