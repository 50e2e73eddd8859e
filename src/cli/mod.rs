//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod balance;
pub mod expense;
pub mod export;
pub mod group;
pub mod settle;
pub mod simplify;

pub use audit::handle_audit_command;
pub use balance::handle_balance_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, handle_import_command, ExportFormat};
pub use group::{handle_group_command, GroupCommands};
pub use settle::{handle_settle_command, handle_settle_history_command, SettleArgs};
pub use simplify::{handle_simplify_command, load_balance_file};

use chrono::NaiveDate;

use crate::error::{SplitError, SplitResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(date_str: &str) -> SplitResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        SplitError::Validation(format!(
            "Invalid date format: '{}'. Use YYYY-MM-DD",
            date_str
        ))
    })
}

/// Parse a money argument such as `12.50` or `$1,200`
pub(crate) fn parse_amount(amount_str: &str) -> SplitResult<Money> {
    Money::parse(amount_str)
        .map_err(|e| SplitError::Validation(format!("Invalid amount '{}': {}", amount_str, e)))
}
