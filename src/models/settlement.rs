//! Settlement model
//!
//! A settlement is a payment one member actually made to another to pay down
//! debt. It is stored in the ledger next to expenses and offsets future
//! balance calculations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId, SettlementId};
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,

    pub group_id: GroupId,

    /// Member who paid
    pub from: MemberId,

    /// Member who received the payment
    pub to: MemberId,

    /// Amount actually paid
    pub amount: Money,

    /// The amount the simplifier suggested, if this payment followed a suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_amount: Option<Money>,

    pub date: NaiveDate,

    #[serde(default)]
    pub memo: String,

    pub created_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(
        group_id: GroupId,
        from: MemberId,
        to: MemberId,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            group_id,
            from,
            to,
            amount,
            suggested_amount: None,
            date,
            memo: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether the paid amount differs from the suggestion
    pub fn is_partial(&self) -> bool {
        self.suggested_amount
            .is_some_and(|suggested| suggested != self.amount)
    }

    pub fn involves(&self, member_id: MemberId) -> bool {
        self.from == member_id || self.to == member_id
    }

    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if self.from == self.to {
            return Err(SettlementValidationError::SelfPayment);
        }

        if !self.amount.is_positive() {
            return Err(SettlementValidationError::NonPositiveAmount);
        }

        Ok(())
    }
}

/// Validation errors for settlements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    SelfPayment,
    NonPositiveAmount,
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfPayment => write!(f, "A member cannot settle with themselves"),
            Self::NonPositiveAmount => write!(f, "Settlement amount must be positive"),
        }
    }
}

impl std::error::Error for SettlementValidationError {}
