//! Settlement repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{GroupId, MemberId, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<HashMap<SettlementId, Settlement>>,
}

impl SettlementRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: SettlementData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        for settlement in file_data.settlements {
            data.insert(settlement.id, settlement);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let data = read_lock(&self.data)?;
        let mut settlements: Vec<_> = data.values().cloned().collect();
        sort_by_date(&mut settlements);
        write_json_atomic(&self.path, &SettlementData { settlements })
    }

    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, SplitError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// Settlements of a group, oldest first
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Settlement>, SplitError> {
        let data = read_lock(&self.data)?;
        let mut settlements: Vec<_> = data
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        sort_by_date(&mut settlements);
        Ok(settlements)
    }

    pub fn find_in_group(
        &self,
        group_id: GroupId,
        query: &str,
    ) -> Result<Option<Settlement>, SplitError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .find(|s| s.group_id == group_id && s.id.matches(query))
            .cloned())
    }

    pub fn member_has_settlements(
        &self,
        group_id: GroupId,
        member_id: MemberId,
    ) -> Result<bool, SplitError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .any(|s| s.group_id == group_id && s.involves(member_id)))
    }

    pub fn upsert(&self, settlement: Settlement) -> Result<(), SplitError> {
        write_lock(&self.data)?.insert(settlement.id, settlement);
        Ok(())
    }

    pub fn delete(&self, id: SettlementId) -> Result<Option<Settlement>, SplitError> {
        Ok(write_lock(&self.data)?.remove(&id))
    }

    pub fn delete_by_group(&self, group_id: GroupId) -> Result<usize, SplitError> {
        let mut data = write_lock(&self.data)?;
        let before = data.len();
        data.retain(|_, s| s.group_id != group_id);
        Ok(before - data.len())
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_by_date(settlements: &mut [Settlement]) {
    settlements.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
