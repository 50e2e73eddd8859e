//! Core data models for splitkro
//!
//! Groups, members, expenses with their shares, recorded settlements, and the
//! transient balance/settlement-plan types used by the debt simplifier.

pub mod balance;
pub mod expense;
pub mod group;
pub mod ids;
pub mod member;
pub mod money;
pub mod settlement;

pub use balance::{balance_sum, checked_balance_add, BalanceEntry, Transaction};
pub use expense::{Expense, Share, SplitType};
pub use group::Group;
pub use ids::{ExpenseId, GroupId, MemberId, SettlementId};
pub use member::Member;
pub use money::Money;
pub use settlement::Settlement;
