//! Expense repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Expense, ExpenseId, GroupId, MemberId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let data = read_lock(&self.data)?;
        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_by_date(&mut expenses);
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, SplitError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// Expenses of a group, oldest first
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Expense>, SplitError> {
        let data = read_lock(&self.data)?;
        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        sort_by_date(&mut expenses);
        Ok(expenses)
    }

    /// Find an expense of a group by short or full ID
    pub fn find_in_group(
        &self,
        group_id: GroupId,
        query: &str,
    ) -> Result<Option<Expense>, SplitError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .find(|e| e.group_id == group_id && e.id.matches(query))
            .cloned())
    }

    pub fn member_has_expenses(
        &self,
        group_id: GroupId,
        member_id: MemberId,
    ) -> Result<bool, SplitError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .any(|e| e.group_id == group_id && e.involves(member_id)))
    }

    pub fn upsert(&self, expense: Expense) -> Result<(), SplitError> {
        write_lock(&self.data)?.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, SplitError> {
        Ok(write_lock(&self.data)?.remove(&id))
    }

    /// Remove every expense of a group, returning how many were removed
    pub fn delete_by_group(&self, group_id: GroupId) -> Result<usize, SplitError> {
        let mut data = write_lock(&self.data)?;
        let before = data.len();
        data.retain(|_, e| e.group_id != group_id);
        Ok(before - data.len())
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_by_date(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
