//! Balance aggregation
//!
//! Folds a group's expenses and recorded settlements into one net balance per
//! member, then hands those balances to the simplifier for a settlement plan.

use tracing::warn;

use crate::error::{SplitError, SplitResult};
use crate::models::{
    balance_sum, BalanceEntry, Expense, Group, GroupId, MemberId, Money, Settlement,
};
use crate::storage::Storage;

use super::simplify::{simplify_with_options, SimplifyOptions, SimplifyOutcome};

/// Paid/owed totals behind a member's net balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    /// Expenses paid plus settlements sent
    pub paid: Money,
    /// Shares of expenses plus settlements received
    pub owed: Money,
}

impl MemberBalance {
    pub fn net(&self) -> Money {
        self.paid - self.owed
    }

    pub fn to_entry(&self) -> BalanceEntry {
        BalanceEntry::new(self.member_id, self.name.clone(), self.net())
    }
}

/// Compute paid/owed totals for every member, in group member order
///
/// Members who left the group but still appear in the ledger are ignored; the
/// group service refuses to remove anyone with ledger history.
pub fn compute_member_balances(
    group: &Group,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Vec<MemberBalance> {
    let mut balances: Vec<MemberBalance> = group
        .members
        .iter()
        .map(|m| MemberBalance {
            member_id: m.id,
            name: m.name.clone(),
            paid: Money::zero(),
            owed: Money::zero(),
        })
        .collect();

    for expense in expenses.iter().filter(|e| e.group_id == group.id) {
        if let Some(payer) = member_mut(&mut balances, expense.paid_by) {
            payer.paid += expense.amount;
        }
        for share in &expense.shares {
            if let Some(member) = member_mut(&mut balances, share.member_id) {
                member.owed += share.amount;
            }
        }
    }

    for settlement in settlements.iter().filter(|s| s.group_id == group.id) {
        if let Some(from) = member_mut(&mut balances, settlement.from) {
            from.paid += settlement.amount;
        }
        if let Some(to) = member_mut(&mut balances, settlement.to) {
            to.owed += settlement.amount;
        }
    }

    balances
}

fn member_mut(balances: &mut [MemberBalance], id: MemberId) -> Option<&mut MemberBalance> {
    balances.iter_mut().find(|b| b.member_id == id)
}

/// Net balance per member, ready for the simplifier
pub fn compute_balances(
    group: &Group,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Vec<BalanceEntry> {
    compute_member_balances(group, expenses, settlements)
        .iter()
        .map(MemberBalance::to_entry)
        .collect()
}

/// Service for balance queries over stored groups
pub struct BalanceService<'a> {
    storage: &'a Storage,
    options: SimplifyOptions,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            options: SimplifyOptions::default(),
        }
    }

    /// Use a custom settlement tolerance
    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.options = SimplifyOptions::with_tolerance(tolerance);
        self
    }

    fn group(&self, group_id: GroupId) -> SplitResult<Group> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| SplitError::group_not_found(group_id.to_string()))
    }

    /// Paid/owed/net breakdown per member
    pub fn member_balances(&self, group_id: GroupId) -> SplitResult<Vec<MemberBalance>> {
        let group = self.group(group_id)?;
        let expenses = self.storage.expenses.get_by_group(group_id)?;
        let settlements = self.storage.settlements.get_by_group(group_id)?;

        let balances = compute_member_balances(&group, &expenses, &settlements);

        let sum: Money = balances.iter().map(MemberBalance::net).sum();
        if !sum.is_zero() {
            warn!(
                group = %group.name,
                sum = %sum.to_decimal_string(),
                "group balances do not sum to zero"
            );
        }

        Ok(balances)
    }

    /// Net balances per member
    pub fn balances(&self, group_id: GroupId) -> SplitResult<Vec<BalanceEntry>> {
        Ok(self
            .member_balances(group_id)?
            .iter()
            .map(MemberBalance::to_entry)
            .collect())
    }

    /// Suggested payments that would settle the group
    pub fn suggested_settlements(&self, group_id: GroupId) -> SplitResult<SimplifyOutcome> {
        let balances = self.balances(group_id)?;
        let outcome = simplify_with_options(&balances, self.options);

        if !outcome.is_fully_settled() {
            warn!(
                unresolved = outcome.unresolved.len(),
                sum = ?balance_sum(&balances),
                "settlement plan leaves members unresolved"
            );
        }

        Ok(outcome)
    }

    /// Total spent by the group across all expenses
    pub fn group_total(&self, group_id: GroupId) -> SplitResult<Money> {
        let expenses = self.storage.expenses.get_by_group(group_id)?;
        Ok(expenses.iter().map(|e| e.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Share, SplitType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn group_of(names: &[&str]) -> Group {
        let mut group = Group::new("Trip");
        for name in names {
            group.add_member(Member::new(*name)).unwrap();
        }
        group
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn equal_expense(group: &Group, payer: usize, cents: &[i64]) -> Expense {
        let shares = group
            .members
            .iter()
            .zip(cents)
            .map(|(m, c)| Share::new(m.id, Money::from_cents(*c)))
            .collect();
        Expense::new(
            group.id,
            "Dinner",
            Money::from_cents(cents.iter().sum()),
            group.members[payer].id,
            SplitType::Equal,
            shares,
            date(),
        )
    }

    #[test]
    fn test_single_expense_balances() {
        let group = group_of(&["Asha", "Ravi", "Meera"]);
        let expense = equal_expense(&group, 0, &[3334, 3333, 3333]);

        let balances = compute_balances(&group, &[expense], &[]);

        let nets: Vec<_> = balances.iter().map(|b| b.net_balance).collect();
        assert_eq!(
            nets,
            vec![
                Decimal::new(6666, 2),
                Decimal::new(-3333, 2),
                Decimal::new(-3333, 2)
            ]
        );
        assert_eq!(balance_sum(&balances), Some(Decimal::ZERO));
    }

    #[test]
    fn test_settlement_offsets_balance() {
        let group = group_of(&["Asha", "Ravi"]);
        let expense = equal_expense(&group, 0, &[5000, 5000]);
        let settlement = Settlement::new(
            group.id,
            group.members[1].id,
            group.members[0].id,
            Money::from_cents(5000),
            date(),
        );

        let balances = compute_balances(&group, &[expense], &[settlement]);
        assert!(balances.iter().all(|b| b.net_balance.is_zero()));
    }

    #[test]
    fn test_partial_settlement_leaves_remainder() {
        let group = group_of(&["Asha", "Ravi"]);
        let expense = equal_expense(&group, 0, &[5000, 5000]);
        let settlement = Settlement::new(
            group.id,
            group.members[1].id,
            group.members[0].id,
            Money::from_cents(2000),
            date(),
        );

        let balances = compute_member_balances(&group, &[expense], &[settlement]);
        assert_eq!(balances[0].paid, Money::from_cents(10000));
        assert_eq!(balances[0].owed, Money::from_cents(7000));
        assert_eq!(balances[0].net(), Money::from_cents(3000));
        assert_eq!(balances[1].net(), Money::from_cents(-3000));
    }

    #[test]
    fn test_members_without_activity_are_zero() {
        let group = group_of(&["Asha", "Ravi", "Idle"]);
        let expense = Expense::new(
            group.id,
            "Taxi",
            Money::from_cents(1000),
            group.members[0].id,
            SplitType::Exact,
            vec![
                Share::new(group.members[0].id, Money::from_cents(500)),
                Share::new(group.members[1].id, Money::from_cents(500)),
            ],
            date(),
        );

        let balances = compute_balances(&group, &[expense], &[]);
        assert_eq!(balances.len(), 3);
        assert_eq!(balances[2].display_name, "Idle");
        assert!(balances[2].net_balance.is_zero());
    }

    #[test]
    fn test_other_group_ledger_is_ignored() {
        let group = group_of(&["Asha", "Ravi"]);
        let other = group_of(&["Asha", "Ravi"]);
        let foreign = equal_expense(&other, 0, &[100, 100]);

        let balances = compute_balances(&group, &[foreign], &[]);
        assert!(balances.iter().all(|b| b.net_balance.is_zero()));
    }
}
