//! Expense service
//!
//! Adds expenses to a group (computing shares from the split request), lists
//! and deletes them.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, ExpenseId, Group, GroupId, MemberId, Money};
use crate::storage::Storage;

use super::split::{compute_shares, SplitRequest};

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub group_id: GroupId,
    pub description: String,
    pub amount: Money,
    pub paid_by: MemberId,
    pub split: SplitRequest,
    pub date: NaiveDate,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateExpenseInput) -> SplitResult<Expense> {
        let group = self
            .storage
            .groups
            .get(input.group_id)?
            .ok_or_else(|| SplitError::group_not_found(input.group_id.to_string()))?;

        ensure_member(&group, input.paid_by)?;
        for participant in input.split.participants() {
            ensure_member(&group, participant)?;
        }

        let shares = compute_shares(input.amount, &input.split)?;

        let expense = Expense::new(
            group.id,
            input.description.trim(),
            input.amount,
            input.paid_by,
            input.split.split_type(),
            shares,
            input.date,
        );

        expense
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        info!(
            group = %group.name,
            description = %expense.description,
            amount = %expense.amount.to_decimal_string(),
            split = %expense.split_type,
            "added expense"
        );

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> SplitResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense of a group by short or full ID
    pub fn find(&self, group_id: GroupId, query: &str) -> SplitResult<Option<Expense>> {
        self.storage.expenses.find_in_group(group_id, query)
    }

    /// Expenses of a group, sorted by date then creation time
    pub fn list(&self, group_id: GroupId) -> SplitResult<Vec<Expense>> {
        self.storage.expenses.get_by_group(group_id)
    }

    pub fn delete(&self, id: ExpenseId) -> SplitResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| SplitError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        info!(description = %expense.description, "deleted expense");

        Ok(expense)
    }
}

fn ensure_member(group: &Group, member_id: MemberId) -> SplitResult<()> {
    if group.has_member(member_id) {
        Ok(())
    } else {
        Err(SplitError::member_not_found(format!(
            "{} in {}",
            member_id, group.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::services::GroupService;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn trip(storage: &Storage) -> Group {
        GroupService::new(storage)
            .create(
                "Trip",
                &["Asha".to_string(), "Ravi".to_string(), "Meera".to_string()],
            )
            .unwrap()
    }

    fn input(group: &Group, split: SplitRequest, cents: i64) -> CreateExpenseInput {
        CreateExpenseInput {
            group_id: group.id,
            description: "Dinner".into(),
            amount: Money::from_cents(cents),
            paid_by: group.members[0].id,
            split,
            date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        }
    }

    #[test]
    fn test_create_equal_expense() {
        let (_temp_dir, storage) = setup();
        let group = trip(&storage);
        let service = ExpenseService::new(&storage);

        let expense = service
            .create(input(&group, SplitRequest::Equal(group.member_ids()), 10000))
            .unwrap();

        let cents: Vec<_> = expense.shares.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(cents, vec![3334, 3333, 3333]);
        assert_eq!(service.list(group.id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_outsider() {
        let (_temp_dir, storage) = setup();
        let group = trip(&storage);
        let service = ExpenseService::new(&storage);

        let split = SplitRequest::Equal(vec![group.members[0].id, MemberId::new()]);
        let err = service.create(input(&group, split, 1000)).unwrap_err();
        assert!(err.is_not_found());
        assert!(service.list(group.id).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_description() {
        let (_temp_dir, storage) = setup();
        let group = trip(&storage);
        let service = ExpenseService::new(&storage);

        let mut bad = input(&group, SplitRequest::Equal(group.member_ids()), 1000);
        bad.description = "   ".into();
        assert!(service.create(bad).unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_and_find() {
        let (_temp_dir, storage) = setup();
        let group = trip(&storage);
        let service = ExpenseService::new(&storage);

        let expense = service
            .create(input(&group, SplitRequest::Equal(group.member_ids()), 900))
            .unwrap();
        let found = service
            .find(group.id, &expense.id.to_string())
            .unwrap()
            .unwrap();
        assert_eq!(found.id, expense.id);

        service.delete(expense.id).unwrap();
        assert!(service.get(expense.id).unwrap().is_none());
        assert!(service.delete(expense.id).unwrap_err().is_not_found());
    }
}
