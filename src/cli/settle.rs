//! Settle CLI commands
//!
//! Records payments between members, either explicitly or by following the
//! current suggested plan.

use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_settlement_history;
use crate::error::{SplitError, SplitResult};
use crate::services::{BalanceService, GroupService, RecordSettlementInput, SettlementService};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Arguments for `splitkro settle`
#[derive(Args)]
pub struct SettleArgs {
    /// Group name or ID
    pub group: String,

    /// Member who paid
    #[arg(long, conflicts_with = "auto")]
    pub from: Option<String>,

    /// Member who received the payment
    #[arg(long, conflicts_with = "auto")]
    pub to: Option<String>,

    /// Amount paid (default: the suggested amount between the two members)
    #[arg(short, long, conflicts_with = "auto")]
    pub amount: Option<String>,

    /// Record the next suggested payment involving this member
    #[arg(long)]
    pub auto: Option<String>,

    /// Payment date (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Free-text note
    #[arg(short, long)]
    pub memo: Option<String>,
}

/// Handle `splitkro settle`
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    args: SettleArgs,
) -> SplitResult<()> {
    let groups = GroupService::new(storage);
    let service = SettlementService::new(storage).with_tolerance(settings.settle_tolerance());
    let symbol = settings.currency_symbol.as_str();

    let group = groups.resolve(&args.group)?;

    if let Some(member) = args.auto {
        let member = groups.resolve_member(&group, &member)?;
        match service.record_suggested(group.id, member.id)? {
            Some(settlement) => println!(
                "Recorded: {} paid {} {}",
                group.member_name(settlement.from),
                group.member_name(settlement.to),
                settlement.amount.format_with_symbol(symbol)
            ),
            None => println!("{} is already settled up.", member.name),
        }
        return Ok(());
    }

    let (Some(from), Some(to)) = (args.from, args.to) else {
        return Err(SplitError::Validation(
            "Specify --from and --to, or --auto <member>".into(),
        ));
    };
    let from = groups.resolve_member(&group, &from)?;
    let to = groups.resolve_member(&group, &to)?;

    let suggestion = BalanceService::new(storage)
        .with_tolerance(settings.settle_tolerance())
        .suggested_settlements(group.id)?
        .transactions
        .into_iter()
        .find(|t| t.from_member_id == from.id && t.to_member_id == to.id)
        .map(|t| t.amount);

    let amount = match (args.amount, suggestion) {
        (Some(amount), _) => parse_amount(&amount)?,
        (None, Some(suggested)) => suggested,
        (None, None) => {
            return Err(SplitError::Settlement(format!(
                "No suggested payment from {} to {}; pass --amount",
                from.name, to.name
            )))
        }
    };

    let date = args.date.as_deref().map(parse_date).transpose()?;

    let settlement = service.record(RecordSettlementInput {
        group_id: group.id,
        from: from.id,
        to: to.id,
        amount,
        suggested: suggestion,
        date,
        memo: args.memo,
    })?;

    println!(
        "Recorded: {} paid {} {}",
        from.name,
        to.name,
        settlement.amount.format_with_symbol(symbol)
    );
    if let Some(suggested) = settlement.suggested_amount.filter(|_| settlement.is_partial()) {
        println!(
            "  Partial payment: {} was suggested",
            suggested.format_with_symbol(symbol)
        );
    }

    Ok(())
}

/// Handle `splitkro settle-history <group>`
pub fn handle_settle_history_command(
    storage: &Storage,
    settings: &Settings,
    group: &str,
) -> SplitResult<()> {
    let group = GroupService::new(storage).resolve(group)?;
    let settlements = SettlementService::new(storage).list(group.id)?;

    print!(
        "{}",
        format_settlement_history(
            &group,
            &settlements,
            &settings.currency_symbol,
            &settings.date_format
        )
    );

    Ok(())
}
