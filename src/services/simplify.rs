//! Debt simplification
//!
//! Turns a set of net balances into a short list of payments that settles
//! everyone, by repeatedly matching the largest creditor with the largest
//! debtor. This is the usual greedy heuristic for debt netting: not always the
//! theoretical minimum number of payments, but never more than `n - 1` for `n`
//! participants, and fast for group sizes that occur in practice.
//!
//! Balances arrive as exact decimals and are rounded to whole cents once,
//! before matching, without breaking their sum: each balance is floored to
//! the cent and the cents lost to flooring go back one at a time to the
//! largest remainders. Every member moves by less than a cent and a zero-sum
//! input stays exactly zero-sum, so the matching itself runs on integer cents
//! and always converges.
//!
//! Ordering: the working set is sorted by balance descending, then by member
//! ID ascending, on every round. The first entry pays out as creditor and the
//! last entry pays in as debtor. Among equal creditors the smallest ID wins;
//! among equal debtors the largest ID wins. Input order never matters.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::models::{BalanceEntry, MemberId, Money, Transaction};

/// Default settlement tolerance: one cent
pub const DEFAULT_TOLERANCE: Money = Money::from_cents(1);

/// Balances beyond this many cents are left unmatched instead of risking overflow
const MAX_WORKING_CENTS: i64 = i64::MAX / 4;

/// Tuning knobs for [`simplify_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Balances within this distance of zero are treated as settled
    pub tolerance: Money,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SimplifyOptions {
    pub fn with_tolerance(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

/// Result of a simplification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyOutcome<Id = MemberId> {
    /// Payments in the order they were matched
    pub transactions: Vec<Transaction<Id>>,

    /// Participants still holding a balance outside tolerance
    ///
    /// Always empty when the input balances sum to zero. Non-empty means the
    /// ledger that produced the balances is inconsistent: only creditors or
    /// only debtors were left with nobody to match against.
    pub unresolved: Vec<BalanceEntry<Id>>,
}

impl<Id> SimplifyOutcome<Id> {
    pub fn is_fully_settled(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// A balance rounded to cents, as matched by the simplifier
#[derive(Debug, Clone)]
struct Working<Id> {
    member_id: Id,
    display_name: String,
    balance: Money,
}

impl<Id> Working<Id> {
    fn into_entry(self) -> BalanceEntry<Id> {
        BalanceEntry::new(self.member_id, self.display_name, self.balance)
    }
}

/// Compute settling payments with the default one-cent tolerance
///
/// Total function: empty input, a single entry, or all-zero balances yield an
/// empty list.
///
/// # Examples
/// ```
/// use splitkro::models::{BalanceEntry, Money};
/// use splitkro::services::simplify::simplify_debts;
///
/// let balances = vec![
///     BalanceEntry::new("a", "Asha", Money::from_cents(-5000)),
///     BalanceEntry::new("b", "Ravi", Money::from_cents(5000)),
/// ];
/// let plan = simplify_debts(&balances);
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].to_string(), "Asha pays Ravi 50.00");
/// ```
pub fn simplify_debts<Id: Clone + Ord>(entries: &[BalanceEntry<Id>]) -> Vec<Transaction<Id>> {
    simplify_with_options(entries, SimplifyOptions::default()).transactions
}

/// Compute settling payments and report anything left unmatched
pub fn simplify_with_options<Id: Clone + Ord>(
    entries: &[BalanceEntry<Id>],
    options: SimplifyOptions,
) -> SimplifyOutcome<Id> {
    let tolerance = options.tolerance.abs();
    let (working, mut unresolved) = quantize(entries);

    let mut working: Vec<Working<Id>> = working
        .into_iter()
        .filter(|w| !w.balance.is_within(tolerance))
        .collect();
    let mut transactions = Vec::new();

    while working.len() >= 2 {
        working.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        let last = working.len() - 1;
        let (creditor, debtor) = (&working[0], &working[last]);

        if creditor.balance <= tolerance || debtor.balance >= -tolerance {
            break;
        }

        let amount = creditor.balance.min(-debtor.balance);

        debug!(
            from = %debtor.display_name,
            to = %creditor.display_name,
            amount = %amount.to_decimal_string(),
            "matched largest debtor with largest creditor"
        );

        transactions.push(Transaction {
            from_member_id: debtor.member_id.clone(),
            from_display_name: debtor.display_name.clone(),
            to_member_id: creditor.member_id.clone(),
            to_display_name: creditor.display_name.clone(),
            amount,
        });

        working[0].balance -= amount;
        working[last].balance += amount;

        working.retain(|w| !w.balance.is_within(tolerance));
    }

    unresolved.extend(working.into_iter().map(Working::into_entry));

    SimplifyOutcome {
        transactions,
        unresolved,
    }
}

/// Round balances to whole cents while preserving their total
///
/// The cents lost to flooring, rounded half away from zero, are handed back
/// to the largest fractional remainders (smallest member ID first on ties).
/// Entries too large to hold in cents come back separately, untouched.
fn quantize<Id: Clone + Ord>(
    entries: &[BalanceEntry<Id>],
) -> (Vec<Working<Id>>, Vec<BalanceEntry<Id>>) {
    let hundred = Decimal::from(100);
    let mut working: Vec<Working<Id>> = Vec::with_capacity(entries.len());
    let mut remainders: Vec<(usize, Decimal)> = Vec::with_capacity(entries.len());
    let mut out_of_range = Vec::new();

    for entry in entries {
        let scaled = entry.net_balance.checked_mul(hundred);
        let floored = scaled.and_then(|s| {
            s.floor()
                .to_i64()
                .filter(|c| c.checked_abs().is_some_and(|a| a <= MAX_WORKING_CENTS))
                .map(|c| (s, c))
        });

        let Some((scaled, cents)) = floored else {
            warn!(
                member = %entry.display_name,
                "balance too large to settle, leaving it unmatched"
            );
            out_of_range.push(entry.clone());
            continue;
        };

        remainders.push((working.len(), scaled - Decimal::from(cents)));
        working.push(Working {
            member_id: entry.member_id.clone(),
            display_name: entry.display_name.clone(),
            balance: Money::from_cents(cents),
        });
    }

    let lost = remainders
        .iter()
        .fold(Decimal::ZERO, |acc, (_, r)| acc + *r);
    let give_back = lost
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_usize()
        .unwrap_or(0);

    remainders.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| working[a.0].member_id.cmp(&working[b.0].member_id))
    });
    for (index, _) in remainders.into_iter().take(give_back) {
        working[index].balance += Money::from_cents(1);
    }

    (working, out_of_range)
}

/// Apply a payment plan to balances, returning the resulting balances
///
/// The payer's balance rises toward zero and the receiver's falls toward zero.
pub fn apply_transactions<Id: Clone + PartialEq>(
    entries: &[BalanceEntry<Id>],
    transactions: &[Transaction<Id>],
) -> Vec<BalanceEntry<Id>> {
    let mut result = entries.to_vec();
    for txn in transactions {
        let amount = txn.amount.to_decimal();
        if let Some(from) = result.iter_mut().find(|e| e.member_id == txn.from_member_id) {
            from.net_balance += amount;
        }
        if let Some(to) = result.iter_mut().find(|e| e.member_id == txn.to_member_id) {
            to.net_balance -= amount;
        }
    }
    result
}
