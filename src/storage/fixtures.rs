//! Test fixtures: small doughub-shaped databases written with a normal
//! read-write connection, then closed before the inspector opens them.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};

use super::schema;

/// Builder for one `source_items` row
pub struct ItemSpec {
    pub id: String,
    pub title: Option<String>,
    pub source_type: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl ItemSpec {
    pub fn new(id: &str, status: &str, created_at: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            source_type: Some("qbank".to_string()),
            status: status.to_string(),
            created_at: created_at.to_string(),
            updated_at: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn updated(mut self, updated_at: &str) -> Self {
        self.updated_at = Some(updated_at.to_string());
        self
    }
}

/// Create `dir/name` with a populated `source_items` table
pub fn create_db(dir: &Path, name: &str, items: &[ItemSpec]) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute(schema::CREATE_SOURCE_ITEMS_TABLE, []).unwrap();
    for item in items {
        conn.execute(
            "INSERT INTO source_items (id, title, sourceType, sourceName, status, createdAt, updatedAt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id,
                item.title,
                item.source_type,
                "fixture",
                item.status,
                item.created_at,
                item.updated_at,
            ],
        )
        .unwrap();
    }
    path
}

/// Like [`create_db`], but the file is left in `journal_mode=WAL`.
///
/// The connection is closed before returning, so no `-wal`/`-shm` files
/// remain and any that appear later were created by the reader.
pub fn create_wal_db(dir: &Path, name: &str, items: &[ItemSpec]) -> PathBuf {
    let path = dir.join(name);
    {
        let conn = Connection::open(&path).unwrap();
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
    create_db(dir, name, items);
    assert!(!sidecar(&path, "-wal").exists());
    assert!(!sidecar(&path, "-shm").exists());
    path
}

/// `path` with a SQLite sidecar suffix appended, e.g. `doughub.db-wal`
pub fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Create a valid SQLite file that has no `source_items` table
pub fn create_db_without_items(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT)", []).unwrap();
    path
}

/// Write a file that is not a SQLite database at all
pub fn create_corrupt_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is definitely not a sqlite database, just some bytes\n".repeat(64)).unwrap();
    path
}

pub fn set_user_version(path: &Path, version: i64) {
    let conn = Connection::open(path).unwrap();
    conn.pragma_update(None, "user_version", version).unwrap();
}
