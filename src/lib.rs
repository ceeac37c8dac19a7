//! # doughub-inspect - Read-only diagnostics for doughub databases
//!
//! Opens the doughub SQLite database (or any of its backups) strictly
//! read-only and reports on the `source_items` table.
//!
//! doughub-inspect provides:
//! - A read-only inspector with parameterized status queries
//! - Backup set discovery and per-file isolated scanning
//! - Serializable reports for the current, backup and template databases
//! - Terminal rendering helpers (tables, themed output)

pub mod item;
pub mod storage;
pub mod config;
pub mod report;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use item::{SourceItem, Status, truncate_title};
pub use config::InspectConfig;
pub use storage::{Inspector, StatusCounts};

/// Result type alias for inspector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for inspector operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}
