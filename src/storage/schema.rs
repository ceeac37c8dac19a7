//! Schema of the doughub database as consumed by the inspector.
//!
//! The application owns this schema; these constants only describe what
//! is read. `CREATE_SOURCE_ITEMS_TABLE` exists for test fixtures.

/// Table holding source items
pub const SOURCE_ITEMS_TABLE: &str = "source_items";

/// Columns selected for a [`crate::SourceItem`], in row order
pub const SOURCE_ITEM_COLUMNS: &str =
    "id, title, sourceType, sourceName, status, createdAt, updatedAt";

/// Checks whether a table with the given name exists
pub const TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// Persisted schema version counter
pub const SCHEMA_VERSION: &str = "PRAGMA user_version";

/// SQL to create the source_items table
pub const CREATE_SOURCE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS source_items (
    id TEXT PRIMARY KEY,
    title TEXT,
    sourceType TEXT,
    sourceName TEXT,
    status TEXT NOT NULL,
    createdAt TEXT NOT NULL,
    updatedAt TEXT
)
"#;
