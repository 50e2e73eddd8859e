//! Balance and settlement-plan types
//!
//! `BalanceEntry` is the input of the debt simplifier and `Transaction` its
//! output. Both are transient: built fresh for every calculation and never
//! stored. They are generic over the member identifier so the simplifier can
//! run on group members (`MemberId`) as well as on raw balance files keyed by
//! arbitrary strings.
//!
//! Balances are exact decimals, so fractional cents from a raw file survive
//! until the simplifier rounds them. Emitted amounts are whole cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MemberId;
use super::money::{self, Money};

/// Largest balance magnitude accepted, in currency units
pub const MAX_BALANCE_UNITS: i64 = 1_000_000_000_000_000;

/// Whether a balance magnitude is within [`MAX_BALANCE_UNITS`]
pub fn within_balance_limit(value: &Decimal) -> bool {
    value.abs() <= Decimal::from(MAX_BALANCE_UNITS)
}

/// Add two balances, failing on overflow or past the balance limit
pub fn checked_balance_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).filter(within_balance_limit)
}

/// A member's net position within a group
///
/// Positive: the group owes this member (creditor). Negative: this member owes
/// the group (debtor). Zero: settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry<Id = MemberId> {
    pub member_id: Id,

    /// Label used only for output, never for ordering
    pub display_name: String,

    #[serde(with = "exact")]
    pub net_balance: Decimal,
}

impl<Id> BalanceEntry<Id> {
    pub fn new(
        member_id: Id,
        display_name: impl Into<String>,
        net_balance: impl Into<Decimal>,
    ) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            net_balance: net_balance.into(),
        }
    }

    pub fn is_creditor(&self) -> bool {
        self.net_balance > Decimal::ZERO
    }

    pub fn is_debtor(&self) -> bool {
        self.net_balance < Decimal::ZERO
    }
}

/// A directed payment instruction: `from` pays `to` the given amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction<Id = MemberId> {
    pub from_member_id: Id,

    pub from_display_name: String,

    pub to_member_id: Id,

    pub to_display_name: String,

    /// Always positive
    #[serde(with = "money::decimal")]
    pub amount: Money,
}

impl<Id: PartialEq> Transaction<Id> {
    pub fn involves(&self, member_id: &Id) -> bool {
        self.from_member_id == *member_id || self.to_member_id == *member_id
    }
}

impl<Id> fmt::Display for Transaction<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} {}",
            self.from_display_name,
            self.to_display_name,
            self.amount.to_decimal_string()
        )
    }
}

/// Sum of all balances; zero for a consistent ledger
///
/// `None` when the sum leaves the accepted balance range.
pub fn balance_sum<Id>(entries: &[BalanceEntry<Id>]) -> Option<Decimal> {
    entries
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| checked_balance_add(acc, e.net_balance))
}

/// Serde adapter for balances: a JSON number or a decimal string, kept exact
mod exact {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::within_balance_limit;
    use crate::models::money::decimal_from_f64;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BalanceRepr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match value.to_f64() {
            Some(number) => serializer.serialize_f64(number),
            None => serializer.serialize_str(&value.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = match BalanceRepr::deserialize(deserializer)? {
            BalanceRepr::Number(number) => decimal_from_f64(number)
                .ok_or_else(|| de::Error::custom(format!("balance out of range: {}", number)))?,
            BalanceRepr::Text(text) => text
                .trim()
                .parse::<Decimal>()
                .map_err(|_| de::Error::custom(format!("invalid balance: {}", text)))?,
        };

        if !within_balance_limit(&value) {
            return Err(de::Error::custom(format!("balance out of range: {}", value)));
        }
        Ok(value)
    }
}
