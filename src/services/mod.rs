//! Service layer for splitkro
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging, and cross-entity operations. The debt
//! simplifier and share computation are pure functions with no storage access.

pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;
pub mod simplify;
pub mod split;

pub use balance::{compute_balances, BalanceService, MemberBalance};
pub use expense::{CreateExpenseInput, ExpenseService};
pub use group::{DeletedGroup, GroupService};
pub use settlement::{RecordSettlementInput, SettlementService};
pub use simplify::{simplify_debts, simplify_with_options, SimplifyOptions, SimplifyOutcome};
pub use split::{compute_shares, SplitRequest};
