//! Storage Layer - read-only access to doughub databases
//!
//! The application's system of record is SQLite with the table:
//! - source_items(id, title, sourceType, sourceName, status, createdAt, updatedAt)
//!
//! plus a `user_version` pragma used as the schema version counter.
//! Nothing in this module ever opens a connection for writing.

pub mod schema;
pub mod inspector;
pub mod backups;

#[cfg(test)]
pub(crate) mod fixtures;

pub use inspector::{Inspector, OrderBy, StatusCounts};
pub use backups::{BackupOutcome, BackupReport, ProfileSummary, discover_backups, scan_backup_set, summarize_profile};
