//! splitkro - terminal-based group expense splitting
//!
//! Tracks shared expenses inside groups, derives each member's net balance,
//! and suggests a short list of payments that settles everyone.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (groups, members, expenses, settlements, money)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic, including the debt simplifier
//! - `audit`: Audit logging system
//! - `display`: Terminal table formatting
//! - `export`: CSV, JSON and YAML export, and import of group exports
//! - `cli`: Command handlers for the `splitkro` binary
//!
//! # Example
//!
//! ```
//! use splitkro::models::{BalanceEntry, Money};
//! use splitkro::services::simplify_debts;
//!
//! let balances = vec![
//!     BalanceEntry::new("asha", "Asha", Money::from_cents(6000)),
//!     BalanceEntry::new("ravi", "Ravi", Money::from_cents(-3000)),
//!     BalanceEntry::new("meera", "Meera", Money::from_cents(-3000)),
//! ];
//!
//! let plan = simplify_debts(&balances);
//! assert_eq!(plan.len(), 2);
//! assert!(plan.iter().all(|t| t.to_display_name == "Asha"));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
