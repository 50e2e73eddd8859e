//! Audit logging for splitkro
//!
//! Every create, update and delete of a group, member, expense or settlement
//! is appended to `audit.log` with before/after snapshots, so the ledger's
//! history can be reconstructed even after entries are deleted.
//!
//! ```rust,ignore
//! use splitkro::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Group,
//!     group.id.to_string(),
//!     Some(group.name.clone()),
//!     &group,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
