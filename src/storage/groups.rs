//! Group repository for JSON storage
//!
//! Groups are stored with their members embedded in `groups.json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Group, GroupId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

pub struct GroupRepository {
    path: PathBuf,
    data: RwLock<HashMap<GroupId, Group>>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: GroupData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        for group in file_data.groups {
            data.insert(group.id, group);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let groups = self.get_all()?;
        write_json_atomic(&self.path, &GroupData { groups })
    }

    pub fn get(&self, id: GroupId) -> Result<Option<Group>, SplitError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All groups, sorted by name (case-insensitive)
    pub fn get_all(&self) -> Result<Vec<Group>, SplitError> {
        let data = read_lock(&self.data)?;
        let mut groups: Vec<_> = data.values().cloned().collect();
        groups.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(groups)
    }

    /// Find a group by name (case-insensitive) or ID
    pub fn find(&self, query: &str) -> Result<Option<Group>, SplitError> {
        let data = read_lock(&self.data)?;
        Ok(data.values().find(|g| g.matches(query)).cloned())
    }

    /// Check whether another group already uses `name`
    pub fn name_exists(&self, name: &str, exclude: Option<GroupId>) -> Result<bool, SplitError> {
        let normalized = Group::normalize_name(name);
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .any(|g| Some(g.id) != exclude && Group::normalize_name(&g.name) == normalized))
    }

    pub fn upsert(&self, group: Group) -> Result<(), SplitError> {
        write_lock(&self.data)?.insert(group.id, group);
        Ok(())
    }

    pub fn delete(&self, id: GroupId) -> Result<Option<Group>, SplitError> {
        Ok(write_lock(&self.data)?.remove(&id))
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        Ok(read_lock(&self.data)?.len())
    }
}
