//! Settlement recorder
//!
//! Records payments members actually made to each other. A recorded
//! settlement feeds back into the balance aggregator as an offsetting entry,
//! so the next suggested plan already reflects it.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitError, SplitResult};
use crate::models::{Group, GroupId, MemberId, Money, Settlement, SettlementId};
use crate::storage::Storage;

use super::balance::BalanceService;

/// Input for recording a payment between two members
#[derive(Debug, Clone)]
pub struct RecordSettlementInput {
    pub group_id: GroupId,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    /// Amount the simplifier suggested, when following a suggestion
    pub suggested: Option<Money>,
    pub date: Option<NaiveDate>,
    pub memo: Option<String>,
}

/// Service for recording and listing settlements
pub struct SettlementService<'a> {
    storage: &'a Storage,
    tolerance: Option<Money>,
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            tolerance: None,
        }
    }

    /// Use a custom tolerance when looking up suggested payments
    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Record a payment; the amount may differ from any suggestion
    pub fn record(&self, input: RecordSettlementInput) -> SplitResult<Settlement> {
        let group = self.group(input.group_id)?;

        for member_id in [input.from, input.to] {
            if !group.has_member(member_id) {
                return Err(SplitError::member_not_found(format!(
                    "{} in {}",
                    member_id, group.name
                )));
            }
        }

        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let mut settlement = Settlement::new(group.id, input.from, input.to, input.amount, date);
        settlement.suggested_amount = input.suggested;
        if let Some(memo) = input.memo {
            settlement.memo = memo;
        }

        settlement
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.settlements.upsert(settlement.clone())?;
        self.storage.settlements.save()?;

        let label = format!(
            "{} -> {}",
            group.member_name(settlement.from),
            group.member_name(settlement.to)
        );
        self.storage.log_create(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(label.clone()),
            &settlement,
        )?;

        info!(
            group = %group.name,
            payment = %label,
            amount = %settlement.amount.to_decimal_string(),
            partial = settlement.is_partial(),
            "recorded settlement"
        );

        Ok(settlement)
    }

    /// Record the first suggested payment involving `member_id`
    ///
    /// Returns `None` when the member has nothing left to pay or receive.
    pub fn record_suggested(
        &self,
        group_id: GroupId,
        member_id: MemberId,
    ) -> SplitResult<Option<Settlement>> {
        let group = self.group(group_id)?;
        if !group.has_member(member_id) {
            return Err(SplitError::member_not_found(member_id.to_string()));
        }

        let mut balances = BalanceService::new(self.storage);
        if let Some(tolerance) = self.tolerance {
            balances = balances.with_tolerance(tolerance);
        }
        let plan = balances.suggested_settlements(group_id)?;

        let Some(txn) = plan
            .transactions
            .into_iter()
            .find(|t| t.involves(&member_id))
        else {
            return Ok(None);
        };

        self.record(RecordSettlementInput {
            group_id,
            from: txn.from_member_id,
            to: txn.to_member_id,
            amount: txn.amount,
            suggested: Some(txn.amount),
            date: None,
            memo: None,
        })
        .map(Some)
    }

    /// Settlements of a group, oldest first
    pub fn list(&self, group_id: GroupId) -> SplitResult<Vec<Settlement>> {
        self.storage.settlements.get_by_group(group_id)
    }

    pub fn find(&self, group_id: GroupId, query: &str) -> SplitResult<Option<Settlement>> {
        self.storage.settlements.find_in_group(group_id, query)
    }

    pub fn delete(&self, id: SettlementId) -> SplitResult<Settlement> {
        let settlement = self
            .storage
            .settlements
            .delete(id)?
            .ok_or_else(|| SplitError::settlement_not_found(id.to_string()))?;
        self.storage.settlements.save()?;

        self.storage.log_delete(
            EntityType::Settlement,
            settlement.id.to_string(),
            None,
            &settlement,
        )?;

        Ok(settlement)
    }

    fn group(&self, group_id: GroupId) -> SplitResult<Group> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| SplitError::group_not_found(group_id.to_string()))
    }
}
