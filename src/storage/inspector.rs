//! Read-only inspector over a doughub database file

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use rusqlite::{Connection, OpenFlags, params};
use serde::Serialize;

use super::schema;
use crate::item::{SourceItem, Status};
use crate::{Error, Result};

/// Earliest instant SQLite `datetime()` accepts
const EARLIEST_CUTOFF: &str = "0000-01-01 00:00:00";

/// Column used to order "recent" listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl OrderBy {
    fn column(self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "createdAt",
            OrderBy::UpdatedAt => "updatedAt",
        }
    }
}

/// Row counts grouped by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub by_status: BTreeMap<Status, u64>,
    pub total: u64,
}

impl StatusCounts {
    /// Count for a single status, zero when absent
    pub fn get(&self, status: &str) -> u64 {
        self.by_status.get(&Status::new(status)).copied().unwrap_or(0)
    }

    /// Sum of all group counts
    pub fn group_sum(&self) -> u64 {
        self.by_status.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_status.is_empty()
    }

    /// `inbox:3, curated:2` style one-liner
    pub fn compact(&self) -> String {
        self.by_status
            .iter()
            .map(|(status, count)| format!("{}:{}", status, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn from_groups(groups: Vec<(Status, u64)>) -> Self {
        let mut by_status: BTreeMap<Status, u64> = BTreeMap::new();
        for (status, count) in groups {
            *by_status.entry(status).or_insert(0) += count;
        }
        let total = by_status.values().sum();
        Self { by_status, total }
    }
}

/// Read-only handle on one database file.
///
/// The connection is opened with `SQLITE_OPEN_READ_ONLY` and closed when
/// the inspector is dropped.
pub struct Inspector {
    conn: Connection,
    path: PathBuf,
}

impl Inspector {
    /// Open an existing database file read-only.
    ///
    /// Used for the live profile database, whose `-wal`/`-shm` sidecars are
    /// owned by the running application.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, path, OpenFlags::SQLITE_OPEN_READ_ONLY)
    }

    /// Open a copy that nothing else writes to (backups, other profiles).
    ///
    /// `immutable=1` keeps SQLite from creating `-wal`/`-shm` files next to
    /// a WAL-mode database, so the directory is left exactly as found.
    pub fn open_immutable(path: &Path) -> Result<Self> {
        let uri = immutable_uri(path);
        Self::open_with(
            path,
            Path::new(&uri),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
    }

    fn open_with(path: &Path, target: &Path, flags: OpenFlags) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        tracing::debug!("Opening {} read-only", target.display());
        let conn = Connection::open_with_flags(target, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Whether the `source_items` table exists
    pub fn has_source_items(&self) -> Result<bool> {
        self.has_table(schema::SOURCE_ITEMS_TABLE)
    }

    fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(schema::TABLE_EXISTS, [name], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Persisted schema version (`PRAGMA user_version`)
    pub fn schema_version(&self) -> Result<i64> {
        let version = self
            .conn
            .query_row(schema::SCHEMA_VERSION, [], |row| row.get(0))?;
        Ok(version)
    }

    // ========== Status Counts ==========

    /// Count all items, grouped by status
    pub fn count_by_status(&self) -> Result<StatusCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM source_items GROUP BY status ORDER BY status",
        )?;
        let groups = stmt
            .query_map([], row_to_group)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut counts = StatusCounts::from_groups(groups);
        let total = self.count_items()?;
        if total != counts.total {
            tracing::warn!(
                "{}: grouped counts ({}) differ from total ({})",
                self.path.display(),
                counts.total,
                total
            );
        }
        counts.total = total;
        Ok(counts)
    }

    /// Count all items
    pub fn count_items(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM source_items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Count items created at or after `now - days`, grouped by status.
    ///
    /// Both sides are normalized with SQLite `datetime()`, so ISO strings
    /// with `T`/`Z`/milliseconds compare correctly against the cutoff.
    pub fn recent_within_window(&self, days: u32, now: DateTime<Utc>) -> Result<StatusCounts> {
        let cutoff = match now.checked_sub_signed(TimeDelta::days(i64::from(days))) {
            Some(cutoff) if cutoff.year() >= 0 => cutoff.format("%Y-%m-%d %H:%M:%S").to_string(),
            // datetime() only understands years 0000-9999
            _ => EARLIEST_CUTOFF.to_string(),
        };
        tracing::debug!("Window cutoff for {} days: {}", days, cutoff);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT status, COUNT(*)
            FROM source_items
            WHERE datetime(createdAt) >= datetime(?1)
            GROUP BY status
            ORDER BY status
            "#,
        )?;
        let groups = stmt
            .query_map([&cutoff], row_to_group)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(StatusCounts::from_groups(groups))
    }

    // ========== Item Listings ==========

    /// Most recent items with `status`, at most `limit`
    pub fn recent_by_status(&self, status: &str, limit: usize, order: OrderBy) -> Result<Vec<SourceItem>> {
        let sql = format!(
            "SELECT {} FROM source_items WHERE status = ?1 ORDER BY {} DESC, id DESC LIMIT ?2",
            schema::SOURCE_ITEM_COLUMNS,
            order.column()
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![status, limit], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Every item with `status`, newest first
    pub fn items_by_status(&self, status: &str) -> Result<Vec<SourceItem>> {
        let sql = format!(
            "SELECT {} FROM source_items WHERE status = ?1 ORDER BY createdAt DESC, id DESC",
            schema::SOURCE_ITEM_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([status], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Items whose `createdAt` falls on the calendar day `today`, newest first
    pub fn today_items(&self, today: NaiveDate) -> Result<Vec<SourceItem>> {
        let sql = format!(
            "SELECT {} FROM source_items WHERE date(createdAt) = ?1 ORDER BY createdAt DESC, id DESC",
            schema::SOURCE_ITEM_COLUMNS
        );
        let day = today.format("%Y-%m-%d").to_string();

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([&day], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }
}

/// `file:` URI with `immutable=1`, escaping characters SQLite treats specially
fn immutable_uri(path: &Path) -> String {
    let mut raw = path.to_string_lossy().replace('\\', "/");
    if raw.as_bytes().get(1) == Some(&b':') {
        raw.insert(0, '/');
    }
    let escaped = raw.replace('%', "%25").replace('?', "%3f").replace('#', "%23");
    format!("file:{}?immutable=1", escaped)
}

fn row_to_group(row: &rusqlite::Row) -> rusqlite::Result<(Status, u64)> {
    let status: Option<String> = row.get(0)?;
    let count: i64 = row.get(1)?;
    Ok((Status::new(status.unwrap_or_default()), count as u64))
}

/// Helper to convert a row selected with [`schema::SOURCE_ITEM_COLUMNS`]
fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<SourceItem> {
    let status: Option<String> = row.get(4)?;
    let created_at: Option<String> = row.get(5)?;

    Ok(SourceItem {
        id: row.get(0)?,
        title: row.get(1)?,
        source_type: row.get(2)?,
        source_name: row.get(3)?,
        status: Status::new(status.unwrap_or_default()),
        created_at: created_at.unwrap_or_default(),
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixtures::{self, ItemSpec};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn sample_items() -> Vec<ItemSpec> {
        vec![
            ItemSpec::new("a", "inbox", "2024-06-15T09:00:00.000Z").title("Morning question"),
            ItemSpec::new("b", "inbox", "2024-06-14T08:00:00.000Z"),
            ItemSpec::new("c", "inbox", "2024-05-01T08:00:00.000Z").title("Old inbox item"),
            ItemSpec::new("d", "curated", "2024-06-10T10:00:00.000Z").updated("2024-06-15T11:00:00.000Z"),
            ItemSpec::new("e", "curated", "2024-06-12T10:00:00.000Z").updated("2024-06-13T11:00:00.000Z"),
            ItemSpec::new("f", "processed", "2024-06-01T12:00:00.000Z"),
            ItemSpec::new("g", "archived", "2024-06-15T10:30:00.000Z"),
        ]
    }

    #[test]
    fn test_open_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.db");
        match Inspector::open(&missing) {
            Err(Error::NotFound(p)) => assert_eq!(p, missing),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
        assert!(!missing.exists());
    }

    #[test]
    fn test_count_by_status_sums_to_total() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let inspector = Inspector::open(&path).unwrap();

        let counts = inspector.count_by_status().unwrap();
        assert_eq!(counts.total, 7);
        assert_eq!(counts.group_sum(), counts.total);
        assert_eq!(counts.total, inspector.count_items().unwrap());
        assert_eq!(counts.get("inbox"), 3);
        assert_eq!(counts.get("curated"), 2);
        assert_eq!(counts.get("processed"), 1);
        assert_eq!(counts.get("archived"), 1);
        assert_eq!(counts.get("missing"), 0);
    }

    #[test]
    fn test_total_is_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![
            ItemSpec::new("1", "", "2024-06-01T00:00:00Z"),
            ItemSpec::new("2", "", "2024-06-02T00:00:00Z"),
            ItemSpec::new("3", "Inbox", "2024-06-03T00:00:00Z"),
            ItemSpec::new("4", "inbox", "2024-06-04T00:00:00Z"),
        ];
        let path = fixtures::create_db(dir.path(), "odd.db", &items);
        let inspector = Inspector::open(&path).unwrap();

        let counts = inspector.count_by_status().unwrap();
        assert_eq!(counts.total, inspector.count_items().unwrap());
        assert_eq!(counts.total, 4);
        assert_eq!(counts.get(""), 2);
        assert_eq!(counts.get("Inbox"), 1);
        assert_eq!(counts.get("inbox"), 1);
        assert_eq!(counts.group_sum(), counts.total);
    }

    #[test]
    fn test_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "empty.db", &[]);
        let inspector = Inspector::open(&path).unwrap();

        let counts = inspector.count_by_status().unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.total, 0);
        assert!(inspector.recent_by_status("inbox", 5, OrderBy::CreatedAt).unwrap().is_empty());
    }

    #[test]
    fn test_recent_by_status_order_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let inspector = Inspector::open(&path).unwrap();

        let inbox = inspector.recent_by_status("inbox", 2, OrderBy::CreatedAt).unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].id, "a");
        assert_eq!(inbox[1].id, "b");
        assert!(inbox.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let all_inbox = inspector.recent_by_status("inbox", 15, OrderBy::CreatedAt).unwrap();
        assert_eq!(all_inbox.len(), 3);
        assert!(all_inbox.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(all_inbox[1].title, None);

        let curated = inspector.recent_by_status("curated", 10, OrderBy::UpdatedAt).unwrap();
        let ids: Vec<_> = curated.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "e"]);
    }

    #[test]
    fn test_items_by_status_unbounded() {
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<ItemSpec> = (0..30)
            .map(|i| ItemSpec::new(&format!("id-{:02}", i), "inbox", &format!("2024-06-{:02}T00:00:00Z", (i % 28) + 1)))
            .collect();
        let path = fixtures::create_db(dir.path(), "many.db", &items);
        let inspector = Inspector::open(&path).unwrap();

        let all = inspector.items_by_status("inbox").unwrap();
        assert_eq!(all.len(), 30);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_recent_within_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let inspector = Inspector::open(&path).unwrap();

        // cutoff 2024-06-01 12:00:00; "f" sits exactly on it
        let window = inspector.recent_within_window(14, fixed_now()).unwrap();
        assert_eq!(window.get("inbox"), 2);
        assert_eq!(window.get("curated"), 2);
        assert_eq!(window.get("processed"), 1);
        assert_eq!(window.get("archived"), 1);
        assert_eq!(window.total, 6);

        let narrow = inspector.recent_within_window(1, fixed_now()).unwrap();
        assert_eq!(narrow.get("inbox"), 1);
        assert_eq!(narrow.get("archived"), 1);
        assert_eq!(narrow.total, 2);
    }

    #[test]
    fn test_window_wider_than_calendar_counts_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let inspector = Inspector::open(&path).unwrap();

        // cutoffs before year 0 and beyond chrono's range both clamp
        for days in [800_000, u32::MAX] {
            let window = inspector.recent_within_window(days, fixed_now()).unwrap();
            assert_eq!(window.total, 7, "days = {}", days);
            assert_eq!(window.get("inbox"), 3);
        }
    }

    #[test]
    fn test_window_mixed_timestamp_formats() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![
            ItemSpec::new("iso", "inbox", "2024-06-10T00:00:00.000Z"),
            ItemSpec::new("space", "inbox", "2024-06-10 00:00:00"),
            ItemSpec::new("old", "inbox", "2024-05-10 00:00:00"),
            ItemSpec::new("junk", "inbox", "not a date"),
        ];
        let path = fixtures::create_db(dir.path(), "mixed.db", &items);
        let inspector = Inspector::open(&path).unwrap();

        let window = inspector.recent_within_window(14, fixed_now()).unwrap();
        assert_eq!(window.get("inbox"), 2);
    }

    #[test]
    fn test_today_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let inspector = Inspector::open(&path).unwrap();

        let today = inspector.today_items(fixed_now().date_naive()).unwrap();
        let ids: Vec<_> = today.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "a"]);

        let none = inspector
            .today_items(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &[]);
        fixtures::set_user_version(&path, 7);

        let inspector = Inspector::open(&path).unwrap();
        assert_eq!(inspector.schema_version().unwrap(), 7);
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db_without_items(dir.path(), "other.db");
        let inspector = Inspector::open(&path).unwrap();

        assert!(!inspector.has_source_items().unwrap());
        assert!(matches!(inspector.count_by_status(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_inspection_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_db(dir.path(), "doughub.db", &sample_items());
        let before_bytes = std::fs::read(&path).unwrap();
        let before_mtime = std::fs::metadata(&path).unwrap().modified().unwrap();

        {
            let inspector = Inspector::open(&path).unwrap();
            inspector.has_source_items().unwrap();
            inspector.count_by_status().unwrap();
            inspector.recent_by_status("inbox", 15, OrderBy::CreatedAt).unwrap();
            inspector.recent_by_status("curated", 10, OrderBy::UpdatedAt).unwrap();
            inspector.recent_within_window(14, fixed_now()).unwrap();
            inspector.today_items(fixed_now().date_naive()).unwrap();
            inspector.schema_version().unwrap();
        }

        assert_eq!(std::fs::read(&path).unwrap(), before_bytes);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before_mtime);
        assert!(!dir.path().join("doughub.db-wal").exists());
    }

    #[test]
    fn test_immutable_open_of_wal_database_creates_no_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_wal_db(dir.path(), "backup.db", &sample_items());
        let before_bytes = std::fs::read(&path).unwrap();
        let before_mtime = std::fs::metadata(&path).unwrap().modified().unwrap();

        {
            let inspector = Inspector::open_immutable(&path).unwrap();
            assert!(inspector.has_source_items().unwrap());
            assert_eq!(inspector.count_by_status().unwrap().total, 7);
            assert_eq!(inspector.recent_by_status("inbox", 5, OrderBy::CreatedAt).unwrap().len(), 3);
            inspector.schema_version().unwrap();
        }

        assert!(!fixtures::sidecar(&path, "-wal").exists());
        assert!(!fixtures::sidecar(&path, "-shm").exists());
        assert_eq!(std::fs::read(&path).unwrap(), before_bytes);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before_mtime);
    }

    #[test]
    fn test_open_immutable_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.db");
        assert!(matches!(Inspector::open_immutable(&missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_immutable_uri() {
        assert_eq!(
            immutable_uri(Path::new("/data/backups/doughub.db")),
            "file:/data/backups/doughub.db?immutable=1"
        );
        assert_eq!(
            immutable_uri(Path::new("/tmp/50%?#/a.db")),
            "file:/tmp/50%25%3f%23/a.db?immutable=1"
        );
        assert_eq!(
            immutable_uri(Path::new(r"C:\Users\me\doughub.db")),
            "file:/C:/Users/me/doughub.db?immutable=1"
        );
    }

    #[test]
    fn test_immutable_open_with_special_characters_in_path() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("odd?name#100%");
        std::fs::create_dir(&nested).unwrap();
        let path = fixtures::create_db(&nested, "doughub.db", &sample_items());

        let inspector = Inspector::open_immutable(&path).unwrap();
        assert_eq!(inspector.count_items().unwrap(), 7);
    }
}
