//! Expense model
//!
//! An expense is paid by one member and divided into shares among one or more
//! members. Shares always add up to the expense amount exactly; the split
//! service guarantees this when an expense is created.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ExpenseId, GroupId, MemberId};
use super::money::Money;

/// How an expense's total is divided among members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Equal shares; leftover cents go to the first participants
    #[default]
    Equal,
    /// Each share given as an exact amount
    Exact,
    /// Each share given as a percentage of the total
    Percentage,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "Equal"),
            Self::Exact => write!(f, "Exact"),
            Self::Percentage => write!(f, "Percentage"),
        }
    }
}

impl FromStr for SplitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "equally" => Ok(Self::Equal),
            "exact" | "manual" | "amount" => Ok(Self::Exact),
            "percent" | "percentage" | "pct" => Ok(Self::Percentage),
            other => Err(format!(
                "unknown split type '{}' (expected equal, exact or percent)",
                other
            )),
        }
    }
}

/// One member's portion of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub member_id: MemberId,
    pub amount: Money,
}

impl Share {
    pub fn new(member_id: MemberId, amount: Money) -> Self {
        Self { member_id, amount }
    }
}

/// A shared expense within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub group_id: GroupId,

    pub description: String,

    /// Total amount paid (always positive)
    pub amount: Money,

    /// Member who paid the full amount
    pub paid_by: MemberId,

    #[serde(default)]
    pub split_type: SplitType,

    /// Per-member portions, summing to `amount`
    pub shares: Vec<Share>,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        group_id: GroupId,
        description: impl Into<String>,
        amount: Money,
        paid_by: MemberId,
        split_type: SplitType,
        shares: Vec<Share>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            group_id,
            description: description.into(),
            amount,
            paid_by,
            split_type,
            shares,
            date,
            created_at: Utc::now(),
        }
    }

    /// The share owed by a member, zero if they are not a participant
    pub fn share_of(&self, member_id: MemberId) -> Money {
        self.shares
            .iter()
            .filter(|s| s.member_id == member_id)
            .map(|s| s.amount)
            .sum()
    }

    /// Check whether a member paid for or takes part in this expense
    pub fn involves(&self, member_id: MemberId) -> bool {
        self.paid_by == member_id || self.shares.iter().any(|s| s.member_id == member_id)
    }

    pub fn shares_total(&self) -> Money {
        self.shares.iter().map(|s| s.amount).sum()
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount);
        }

        if self.shares.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }

        if self.shares.iter().any(|s| s.amount.is_negative()) {
            return Err(ExpenseValidationError::NegativeShare);
        }

        let shares_total = self.shares_total();
        if shares_total != self.amount {
            return Err(ExpenseValidationError::SharesMismatch {
                amount: self.amount,
                shares_total,
            });
        }

        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount,
    NoParticipants,
    NegativeShare,
    SharesMismatch { amount: Money, shares_total: Money },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Expense amount must be positive"),
            Self::NoParticipants => write!(f, "Expense must be split among at least one member"),
            Self::NegativeShare => write!(f, "Expense shares cannot be negative"),
            Self::SharesMismatch {
                amount,
                shares_total,
            } => write!(
                f,
                "Shares total {} does not match expense amount {}",
                shares_total, amount
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
