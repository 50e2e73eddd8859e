//! Storage layer for splitkro
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Repositories keep their data in memory behind an `RwLock` and
//! write the whole file back on `save`.

pub mod expenses;
pub mod file_io;
pub mod groups;
pub mod init;
pub mod settlements;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use init::initialize_storage;
pub use settlements::SettlementRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SplitPaths;
use crate::error::SplitError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitPaths,
    audit: AuditLogger,
    pub groups: GroupRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SplitPaths) -> Result<Self, SplitError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            groups: GroupRepository::new(paths.groups_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SplitPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitError> {
        self.groups.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitError> {
        self.groups.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitError> {
        self.audit.log(&AuditEntry::create(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> Result<(), SplitError> {
        let mut entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after);
        if let Some(summary) = summary {
            entry = entry.with_summary(summary);
        }
        self.audit.log(&entry)
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitError> {
        self.audit.log(&AuditEntry::delete(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, SplitError> {
    lock.read()
        .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, SplitError> {
    lock.write()
        .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))
}
