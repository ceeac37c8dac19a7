//! Report assembly
//!
//! Each command builds one serializable report from [`Inspector`] calls.
//! Absent targets are expressed as `exists: false` instead of an error,
//! so a run always reaches its closing banner for expected conditions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::InspectConfig;
use crate::item::{SourceItem, Status};
use crate::storage::{
    BackupReport, Inspector, OrderBy, ProfileSummary, StatusCounts, scan_backup_set, summarize_profile,
};
use crate::{Error, Result};

/// Bounds applied to listings and windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub inbox: usize,
    pub curated: usize,
    pub window_days: u32,
    pub backup_sample: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            inbox: 15,
            curated: 10,
            window_days: 14,
            backup_sample: 5,
        }
    }
}

/// Report on the current profile database
#[derive(Debug, Clone, Serialize)]
pub struct DiagnoseReport {
    pub database: PathBuf,
    pub exists: bool,
    pub table_present: bool,
    pub schema_version: Option<i64>,
    pub counts: Option<StatusCounts>,
    pub inbox: Vec<SourceItem>,
    pub curated: Vec<SourceItem>,
    pub window_days: u32,
    pub window_counts: Option<StatusCounts>,
    pub today: Vec<SourceItem>,
    pub generated_at: DateTime<Utc>,
}

impl DiagnoseReport {
    fn empty(database: PathBuf, exists: bool, window_days: u32, now: DateTime<Utc>) -> Self {
        Self {
            database,
            exists,
            table_present: false,
            schema_version: None,
            counts: None,
            inbox: Vec::new(),
            curated: Vec::new(),
            window_days,
            window_counts: None,
            today: Vec::new(),
            generated_at: now,
        }
    }
}

/// Inspect the current database.
///
/// A missing file or table is reported in the result; any other failure
/// propagates.
pub fn build_diagnose(config: &InspectConfig, limits: &ReportLimits, now: DateTime<Utc>) -> Result<DiagnoseReport> {
    let database = config.db_path();
    let mut report = DiagnoseReport::empty(database.clone(), database.exists(), limits.window_days, now);
    if !report.exists {
        tracing::info!("Database {} does not exist", database.display());
        return Ok(report);
    }

    let inspector = Inspector::open(&database)?;
    report.schema_version = Some(inspector.schema_version()?);
    report.table_present = inspector.has_source_items()?;
    if !report.table_present {
        return Ok(report);
    }

    report.counts = Some(inspector.count_by_status()?);
    report.inbox = inspector.recent_by_status(Status::INBOX, limits.inbox, OrderBy::CreatedAt)?;
    report.curated = inspector.recent_by_status(Status::CURATED, limits.curated, OrderBy::UpdatedAt)?;
    report.window_counts = Some(inspector.recent_within_window(limits.window_days, now)?);
    report.today = inspector.today_items(now.date_naive())?;

    Ok(report)
}

/// All items sharing one status
#[derive(Debug, Clone, Serialize)]
pub struct StatusGroup {
    pub status: Status,
    pub items: Vec<SourceItem>,
}

/// Full listing of an alternate profile database
#[derive(Debug, Clone, Serialize)]
pub struct TemplateReport {
    pub profile: String,
    pub database: PathBuf,
    pub exists: bool,
    pub table_present: bool,
    pub schema_version: Option<i64>,
    pub groups: Vec<StatusGroup>,
}

impl TemplateReport {
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// List every item of `profile`, grouped by status.
///
/// Well-known statuses come first (inbox, processed, curated) and always
/// appear; any other status found in the file follows alphabetically.
pub fn build_template(config: &InspectConfig, profile: &str) -> Result<TemplateReport> {
    let database = config.profile_db_path(profile);
    let mut report = TemplateReport {
        profile: profile.to_string(),
        exists: database.exists(),
        database,
        table_present: false,
        schema_version: None,
        groups: Vec::new(),
    };
    if !report.exists {
        tracing::info!("Database {} does not exist", report.database.display());
        return Ok(report);
    }

    let inspector = Inspector::open_immutable(&report.database)?;
    report.schema_version = Some(inspector.schema_version()?);
    report.table_present = inspector.has_source_items()?;
    if !report.table_present {
        return Ok(report);
    }

    let mut statuses = vec![Status::inbox(), Status::processed(), Status::curated()];
    let counts = inspector.count_by_status()?;
    statuses.extend(counts.by_status.keys().filter(|s| !s.is_known()).cloned());

    for status in statuses {
        let items = inspector.items_by_status(status.as_str())?;
        report.groups.push(StatusGroup { status, items });
    }

    Ok(report)
}

/// Result of scanning the backup directory
#[derive(Debug, Clone, Serialize)]
pub struct BackupScanReport {
    pub directory: PathBuf,
    pub exists: bool,
    pub pattern: String,
    pub backups: Vec<BackupReport>,
    /// Template profile database, when one exists
    pub template: Option<ProfileSummary>,
}

/// Scan the backup set, then summarize the template profile if present.
///
/// Per-file failures are folded into each [`BackupReport`]; a missing
/// directory yields `exists: false`.
pub fn build_backup_scan(config: &InspectConfig, limits: &ReportLimits) -> Result<BackupScanReport> {
    let directory = config.backups_dir();
    let (exists, backups) = match scan_backup_set(&directory, &config.backup_pattern, limits.backup_sample) {
        Ok(backups) => (true, backups),
        Err(Error::NotFound(_)) => {
            tracing::info!("Backups directory {} does not exist", directory.display());
            (false, Vec::new())
        }
        Err(e) => return Err(e),
    };

    let template = summarize_profile(&config.template_db_path());
    let template = template.exists.then_some(template);

    Ok(BackupScanReport {
        directory,
        exists,
        pattern: config.backup_pattern.clone(),
        backups,
        template,
    })
}
