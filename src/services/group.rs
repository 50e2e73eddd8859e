//! Group service
//!
//! Business logic for groups and their members: creation, membership changes,
//! renaming, and cascading deletion of a group's ledger.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitError, SplitResult};
use crate::models::{Expense, Group, GroupId, Member, MemberId, Settlement};
use crate::storage::Storage;

use super::balance::{BalanceService, MemberBalance};

/// What a group deletion removed
#[derive(Debug, Clone)]
pub struct DeletedGroup {
    pub group: Group,
    pub expenses_removed: usize,
    pub settlements_removed: usize,
}

/// Service for group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new group, optionally with initial members
    pub fn create(&self, name: &str, member_names: &[String]) -> SplitResult<Group> {
        let name = name.trim();

        if self.storage.groups.name_exists(name, None)? {
            return Err(SplitError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        let mut group = Group::new(name);
        group
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        for member_name in member_names {
            let member = Member::new(member_name.trim());
            member
                .validate()
                .map_err(|e| SplitError::Validation(e.to_string()))?;
            group
                .add_member(member)
                .map_err(|e| SplitError::Validation(e.to_string()))?;
        }

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        info!(group = %group.name, members = group.members.len(), "created group");

        Ok(group)
    }

    pub fn get(&self, id: GroupId) -> SplitResult<Option<Group>> {
        self.storage.groups.get(id)
    }

    /// Find a group by name or ID
    pub fn find(&self, query: &str) -> SplitResult<Option<Group>> {
        self.storage.groups.find(query)
    }

    /// Find a group by name or ID, failing when it doesn't exist
    pub fn resolve(&self, query: &str) -> SplitResult<Group> {
        self.find(query)?
            .ok_or_else(|| SplitError::group_not_found(query))
    }

    pub fn list(&self) -> SplitResult<Vec<Group>> {
        self.storage.groups.get_all()
    }

    /// Resolve a member of a group by name or ID
    pub fn resolve_member(&self, group: &Group, query: &str) -> SplitResult<Member> {
        group
            .find_member(query)
            .cloned()
            .ok_or_else(|| SplitError::member_not_found(format!("{} in {}", query, group.name)))
    }

    pub fn add_member(&self, group_id: GroupId, name: &str) -> SplitResult<Member> {
        let mut group = self.require(group_id)?;
        let before = group.clone();

        let member = Member::new(name.trim());
        member
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        group.add_member(member.clone()).map_err(|_| SplitError::Duplicate {
            entity_type: "Member",
            identifier: member.name.clone(),
        })?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &before,
            &group,
            Some(format!("joined {}", group.name)),
        )?;

        info!(group = %group.name, member = %member.name, "added member");

        Ok(member)
    }

    /// Remove a member who has no ledger history and nothing outstanding
    pub fn remove_member(&self, group_id: GroupId, member_id: MemberId) -> SplitResult<Member> {
        let mut group = self.require(group_id)?;
        let before = group.clone();

        let member = group
            .member(member_id)
            .cloned()
            .ok_or_else(|| SplitError::member_not_found(member_id.to_string()))?;

        if self.storage.expenses.member_has_expenses(group_id, member_id)? {
            return Err(SplitError::Validation(format!(
                "{} has expenses in {}; delete them before removing the member",
                member.name, group.name
            )));
        }

        let balance = BalanceService::new(self.storage)
            .member_balances(group_id)?
            .iter()
            .find(|b| b.member_id == member_id)
            .map(MemberBalance::net)
            .unwrap_or_default();
        if !balance.is_zero() {
            return Err(SplitError::Settlement(format!(
                "{} still has an outstanding balance of {}",
                member.name,
                balance.to_decimal_string()
            )));
        }

        if self
            .storage
            .settlements
            .member_has_settlements(group_id, member_id)?
        {
            return Err(SplitError::Validation(format!(
                "{} has recorded settlements in {}",
                member.name, group.name
            )));
        }

        group.remove_member(member_id);
        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &before,
            &group,
            Some(format!("left {}", group.name)),
        )?;

        info!(group = %group.name, member = %member.name, "removed member");

        Ok(member)
    }

    pub fn rename(&self, group_id: GroupId, new_name: &str) -> SplitResult<Group> {
        let mut group = self.require(group_id)?;
        let before = group.clone();
        let new_name = new_name.trim();

        if self.storage.groups.name_exists(new_name, Some(group_id))? {
            return Err(SplitError::Duplicate {
                entity_type: "Group",
                identifier: new_name.to_string(),
            });
        }

        group.rename(new_name);
        group
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            Some(format!("name: {} -> {}", before.name, group.name)),
        )?;

        Ok(group)
    }

    /// Delete a group together with its expenses and settlements
    pub fn delete(&self, group_id: GroupId) -> SplitResult<DeletedGroup> {
        let group = self.require(group_id)?;

        let expenses_removed = self.storage.expenses.delete_by_group(group_id)?;
        let settlements_removed = self.storage.settlements.delete_by_group(group_id)?;
        self.storage.groups.delete(group_id)?;
        self.storage.save_all()?;

        self.storage.log_delete(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        info!(
            group = %group.name,
            expenses_removed,
            settlements_removed,
            "deleted group"
        );

        Ok(DeletedGroup {
            group,
            expenses_removed,
            settlements_removed,
        })
    }

    /// Restore a group with its ledger, as read from an export
    ///
    /// Fails when a group with the same ID or name already exists.
    pub fn import(
        &self,
        group: Group,
        expenses: Vec<Expense>,
        settlements: Vec<Settlement>,
    ) -> SplitResult<Group> {
        if self.storage.groups.get(group.id)?.is_some()
            || self.storage.groups.name_exists(&group.name, None)?
        {
            return Err(SplitError::Duplicate {
                entity_type: "Group",
                identifier: group.name.clone(),
            });
        }
        group
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        let expense_count = expenses.len();
        let settlement_count = settlements.len();

        self.storage.groups.upsert(group.clone())?;
        for expense in expenses {
            self.storage.expenses.upsert(expense)?;
        }
        for settlement in settlements {
            self.storage.settlements.upsert(settlement)?;
        }
        self.storage.save_all()?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        info!(
            group = %group.name,
            expenses = expense_count,
            settlements = settlement_count,
            "imported group"
        );

        Ok(group)
    }

    fn require(&self, group_id: GroupId) -> SplitResult<Group> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| SplitError::group_not_found(group_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::models::{Money, Share, SplitType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_group_with_members() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        let group = service.create("Goa Trip", &names(&["Asha", "Ravi"])).unwrap();
        assert_eq!(group.members.len(), 2);
        assert_eq!(service.resolve("goa trip").unwrap().id, group.id);
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_group_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        service.create("Flat", &[]).unwrap();
        let err = service.create("FLAT", &[]).unwrap_err();
        assert!(matches!(err, SplitError::Duplicate { .. }));
    }

    #[test]
    fn test_duplicate_member_in_create_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        let err = service
            .create("Flat", &names(&["Asha", "asha"]))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list().unwrap().len(), 0);
    }

    #[test]
    fn test_add_member() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &names(&["Asha"])).unwrap();

        let member = service.add_member(group.id, "Ravi").unwrap();
        let group = service.get(group.id).unwrap().unwrap();
        assert!(group.has_member(member.id));

        let err = service.add_member(group.id, "ravi").unwrap_err();
        assert!(matches!(err, SplitError::Duplicate { .. }));
    }

    #[test]
    fn test_remove_member_without_history() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &names(&["Asha", "Ravi"])).unwrap();
        let ravi = group.find_member("Ravi").unwrap().id;

        service.remove_member(group.id, ravi).unwrap();
        let group = service.get(group.id).unwrap().unwrap();
        assert_eq!(group.members.len(), 1);
    }

    #[test]
    fn test_remove_member_with_expenses_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &names(&["Asha", "Ravi"])).unwrap();
        let asha = group.members[0].id;
        let ravi = group.members[1].id;

        storage
            .expenses
            .upsert(Expense::new(
                group.id,
                "Rent",
                Money::from_cents(1000),
                asha,
                SplitType::Exact,
                vec![
                    Share::new(asha, Money::from_cents(500)),
                    Share::new(ravi, Money::from_cents(500)),
                ],
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ))
            .unwrap();

        let err = service.remove_member(group.id, ravi).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &[]).unwrap();
        service.create("Trip", &[]).unwrap();

        let renamed = service.rename(group.id, "Flat 4B").unwrap();
        assert_eq!(renamed.name, "Flat 4B");

        let err = service.rename(group.id, "trip").unwrap_err();
        assert!(matches!(err, SplitError::Duplicate { .. }));
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &names(&["Asha"])).unwrap();
        let asha = group.members[0].id;

        storage
            .expenses
            .upsert(Expense::new(
                group.id,
                "Snacks",
                Money::from_cents(300),
                asha,
                SplitType::Equal,
                vec![Share::new(asha, Money::from_cents(300))],
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ))
            .unwrap();

        let deleted = service.delete(group.id).unwrap();
        assert_eq!(deleted.expenses_removed, 1);
        assert_eq!(deleted.settlements_removed, 0);
        assert!(service.get(group.id).unwrap().is_none());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_import_restores_deleted_group() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create("Flat", &names(&["Asha", "Ravi"])).unwrap();
        let (asha, ravi) = (group.members[0].id, group.members[1].id);
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let expense = Expense::new(
            group.id,
            "Rent",
            Money::from_cents(1000),
            asha,
            SplitType::Exact,
            vec![
                Share::new(asha, Money::from_cents(500)),
                Share::new(ravi, Money::from_cents(500)),
            ],
            date,
        );
        let settlement = Settlement::new(group.id, ravi, asha, Money::from_cents(200), date);
        service.delete(group.id).unwrap();

        let imported = service
            .import(group.clone(), vec![expense], vec![settlement])
            .unwrap();
        assert_eq!(imported.id, group.id);
        assert_eq!(storage.expenses.get_by_group(group.id).unwrap().len(), 1);
        assert_eq!(storage.settlements.get_by_group(group.id).unwrap().len(), 1);

        let balances = BalanceService::new(&storage).member_balances(group.id).unwrap();
        assert_eq!(balances[1].net(), Money::from_cents(-300));

        let err = service.import(group, vec![], vec![]).unwrap_err();
        assert!(matches!(err, SplitError::Duplicate { .. }));
    }

    #[test]
    fn test_resolve_unknown_group() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        assert!(service.resolve("nope").unwrap_err().is_not_found());
    }
}
