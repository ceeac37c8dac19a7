//! Backup set scanning
//!
//! A backup set is a directory of periodic full copies of the database.
//! Each file is inspected on its own: a corrupt or table-less copy yields
//! an inline outcome for that file and the scan moves on.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use super::inspector::{Inspector, OrderBy, StatusCounts};
use crate::item::{SourceItem, Status};
use crate::{Error, Result};

/// SQLite sidecar suffixes that are never databases on their own
const SIDECAR_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

/// What inspecting one file produced
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackupOutcome {
    Inspected {
        counts: StatusCounts,
        inbox_sample: Vec<SourceItem>,
    },
    MissingTable,
    Failed {
        message: String,
    },
}

impl BackupOutcome {
    pub fn counts(&self) -> Option<&StatusCounts> {
        match self {
            BackupOutcome::Inspected { counts, .. } => Some(counts),
            _ => None,
        }
    }
}

/// Per-file result of a backup scan
#[derive(Debug, Clone, Serialize)]
pub struct BackupReport {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: Option<u64>,
    /// Timestamp embedded in the file name, if any
    pub taken_at: Option<NaiveDateTime>,
    pub outcome: BackupOutcome,
}

/// Summary of a single database outside the backup directory
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub database: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub outcome: Option<BackupOutcome>,
}

/// List backup files in `dir` matching `pattern`, sorted by path.
///
/// Directories and `-wal`/`-shm`/`-journal` sidecars are skipped.
pub fn discover_backups(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped.trim_end_matches('/'), pattern);

    let paths = glob::glob(&full_pattern).map_err(|e| Error::InvalidPattern(e.to_string()))?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file() && !is_sidecar(path))
        .collect();

    files.sort();
    Ok(files)
}

fn is_sidecar(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    SIDECAR_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Inspect every backup in `dir` matching `pattern`.
///
/// Fails only when the directory is missing or the pattern is invalid;
/// per-file problems are reported in [`BackupReport::outcome`].
pub fn scan_backup_set(dir: &Path, pattern: &str, sample_limit: usize) -> Result<Vec<BackupReport>> {
    let files = discover_backups(dir, pattern)?;
    tracing::debug!("Found {} backup files in {}", files.len(), dir.display());

    let reports = files
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let size_bytes = std::fs::metadata(&path).map(|m| m.len()).ok();
            let taken_at = timestamp_from_file_name(&file_name);
            let outcome = inspect_file(&path, sample_limit);

            BackupReport {
                file_name,
                path,
                size_bytes,
                taken_at,
                outcome,
            }
        })
        .collect();

    Ok(reports)
}

/// Size and status counts of a standalone database such as another profile
pub fn summarize_profile(path: &Path) -> ProfileSummary {
    if !path.exists() {
        return ProfileSummary {
            database: path.to_path_buf(),
            exists: false,
            size_bytes: None,
            outcome: None,
        };
    }

    ProfileSummary {
        database: path.to_path_buf(),
        exists: true,
        size_bytes: std::fs::metadata(path).map(|m| m.len()).ok(),
        outcome: Some(inspect_file(path, 0)),
    }
}

/// Inspect one file, folding every error into the outcome
fn inspect_file(path: &Path, sample_limit: usize) -> BackupOutcome {
    match try_inspect(path, sample_limit) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Failed to inspect {}: {}", path.display(), e);
            BackupOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

fn try_inspect(path: &Path, sample_limit: usize) -> Result<BackupOutcome> {
    let inspector = Inspector::open_immutable(path)?;
    if !inspector.has_source_items()? {
        return Ok(BackupOutcome::MissingTable);
    }

    let counts = inspector.count_by_status()?;
    let inbox_sample = if sample_limit > 0 {
        inspector.recent_by_status(Status::INBOX, sample_limit, OrderBy::CreatedAt)?
    } else {
        Vec::new()
    };

    Ok(BackupOutcome::Inspected { counts, inbox_sample })
}

/// Best-effort timestamp from names like `doughub-2024-06-15T10-30-00.db`
/// or `doughub_20240615_103000.db`
pub fn timestamp_from_file_name(name: &str) -> Option<NaiveDateTime> {
    static STAMP: OnceLock<Option<Regex>> = OnceLock::new();
    let re = STAMP
        .get_or_init(|| {
            Regex::new(r"(\d{4})-?(\d{2})-?(\d{2})[T_ \-]?(\d{2})[\-:.]?(\d{2})[\-:.]?(\d{2})").ok()
        })
        .as_ref()?;

    let caps = re.captures(name)?;
    let stamp = format!(
        "{}-{}-{} {}:{}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
    );
    NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S").ok()
}
