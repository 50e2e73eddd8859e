//! Expense CLI commands
//!
//! Implements CLI commands for adding, listing and deleting expenses.

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_list;
use crate::error::{SplitError, SplitResult};
use crate::models::{Group, MemberId, SplitType};
use crate::services::split::parse_percentage;
use crate::services::{CreateExpenseInput, ExpenseService, GroupService, SplitRequest};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense paid by one member
    Add {
        /// Group name or ID
        group: String,
        /// What the money was spent on
        description: String,
        /// Total amount (e.g. 1200.50)
        amount: String,
        /// Member who paid
        #[arg(short, long)]
        paid_by: String,
        /// How to split: equal, exact or percent
        #[arg(short, long)]
        split: Option<SplitType>,
        /// Members sharing an equal split, comma-separated (default: everyone)
        #[arg(short, long, value_delimiter = ',')]
        with: Vec<String>,
        /// Per-member share as member=value (amount for exact, percent for percent)
        #[arg(long = "share")]
        shares: Vec<String>,
        /// Expense date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List a group's expenses
    List {
        /// Group name or ID
        group: String,
    },
    /// Delete an expense
    Delete {
        /// Group name or ID
        group: String,
        /// Expense ID (short form is fine)
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SplitResult<()> {
    let groups = GroupService::new(storage);
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            group,
            description,
            amount,
            paid_by,
            split,
            with,
            shares,
            date,
        } => {
            let group = groups.resolve(&group)?;
            let amount = parse_amount(&amount)?;
            let payer = groups.resolve_member(&group, &paid_by)?;

            // Explicit shares without --split mean exact amounts
            let split_type = split.unwrap_or(if shares.is_empty() {
                settings.default_split
            } else {
                SplitType::Exact
            });
            let split = build_split_request(&groups, &group, split_type, &with, &shares)?;

            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let expense = service.create(CreateExpenseInput {
                group_id: group.id,
                description,
                amount,
                paid_by: payer.id,
                split,
                date,
            })?;

            println!(
                "Added expense {}: {} {} paid by {}",
                expense.id,
                expense.description,
                expense.amount.format_with_symbol(symbol),
                payer.name
            );
            for share in &expense.shares {
                println!(
                    "  {:<20} {:>12}",
                    group.member_name(share.member_id),
                    share.amount.format_with_symbol(symbol)
                );
            }
        }

        ExpenseCommands::List { group } => {
            let group = groups.resolve(&group)?;
            let expenses = service.list(group.id)?;
            print!(
                "{}",
                format_expense_list(&group, &expenses, symbol, &settings.date_format)
            );
        }

        ExpenseCommands::Delete { group, expense } => {
            let group = groups.resolve(&group)?;
            let found = service
                .find(group.id, &expense)?
                .ok_or_else(|| SplitError::expense_not_found(&expense))?;
            let deleted = service.delete(found.id)?;
            println!(
                "Deleted expense: {} ({})",
                deleted.description,
                deleted.amount.format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}

fn build_split_request(
    groups: &GroupService,
    group: &Group,
    split_type: SplitType,
    with: &[String],
    shares: &[String],
) -> SplitResult<SplitRequest> {
    match split_type {
        SplitType::Equal => {
            if !shares.is_empty() {
                return Err(SplitError::Validation(
                    "--share is only used with --split exact or --split percent".into(),
                ));
            }
            let members = if with.is_empty() {
                group.member_ids()
            } else {
                with.iter()
                    .map(|q| groups.resolve_member(group, q).map(|m| m.id))
                    .collect::<SplitResult<Vec<_>>>()?
            };
            Ok(SplitRequest::Equal(members))
        }
        SplitType::Exact => {
            let parsed = parse_shares(groups, group, shares, parse_amount)?;
            Ok(SplitRequest::Exact(parsed))
        }
        SplitType::Percentage => {
            let parsed = parse_shares(groups, group, shares, parse_percentage)?;
            Ok(SplitRequest::Percentage(parsed))
        }
    }
}

/// Parse `member=value` pairs
fn parse_shares<T>(
    groups: &GroupService,
    group: &Group,
    shares: &[String],
    parse_value: impl Fn(&str) -> SplitResult<T>,
) -> SplitResult<Vec<(MemberId, T)>> {
    if shares.is_empty() {
        return Err(SplitError::Validation(
            "This split type needs at least one --share member=value".into(),
        ));
    }

    shares
        .iter()
        .map(|pair| {
            let (member, value) = pair.split_once('=').ok_or_else(|| {
                SplitError::Validation(format!(
                    "Invalid share '{}'. Use member=value",
                    pair
                ))
            })?;
            let member = groups.resolve_member(group, member.trim())?;
            Ok((member.id, parse_value(value.trim())?))
        })
        .collect()
}
