use std::io::{self, Write};

use crate::{OutputMode, emit_json};
use chrono::Utc;
use doughub_inspect::config::InspectConfig;
use doughub_inspect::report::{self, BackupScanReport, DiagnoseReport, ReportLimits, TemplateReport};
use doughub_inspect::storage::BackupOutcome;
use doughub_inspect::ui::{self, Icons};
use doughub_inspect::{SourceItem, Status};
use owo_colors::OwoColorize;

const INBOX_TITLE_WIDTH: usize = 50;
const CURATED_TITLE_WIDTH: usize = 40;
const TODAY_TITLE_WIDTH: usize = 35;
const BACKUP_TITLE_WIDTH: usize = 40;
const TEMPLATE_TITLE_WIDTH: usize = 50;

pub fn run_diagnose(config: &InspectConfig, limits: &ReportLimits, output_mode: OutputMode) -> anyhow::Result<()> {
    let report = report::build_diagnose(config, limits, Utc::now())?;
    if output_mode.is_human() {
        render_diagnose(&mut io::stdout().lock(), &report)?;
    } else {
        emit_json(&report)?;
    }
    Ok(())
}

fn render_diagnose(out: &mut impl Write, report: &DiagnoseReport) -> io::Result<()> {
    ui::banner(
        out,
        "doughub diagnostics",
        &format!("Profile database, {}", report.generated_at.format("%Y-%m-%d %H:%M UTC")),
    )?;
    ui::status(out, Icons::DATABASE, "Database", &report.database.display().to_string())?;
    ui::status(out, Icons::INFO, "Exists", &report.exists.to_string())?;

    if !report.exists {
        ui::warn(out, "Database does not exist, nothing to inspect")?;
        return ui::closing(out, "Diagnostic complete.");
    }
    if let Some(version) = report.schema_version {
        ui::status(out, Icons::PACKAGE, "Schema version", &version.to_string())?;
    }
    if !report.table_present {
        ui::warn(out, "source_items table not found")?;
        return ui::closing(out, "Diagnostic complete.");
    }

    ui::section(out, "STATUS COUNTS")?;
    if let Some(counts) = &report.counts {
        writeln!(out, "{}", ui::status_table(counts))?;
    }

    ui::section(out, "CURRENT INBOX ITEMS")?;
    if report.inbox.is_empty() {
        ui::none_line(out, "No inbox items found")?;
    }
    for (i, item) in report.inbox.iter().enumerate() {
        ui::item_line(out, i + 1, &[item.display_type()], &item.display_title(INBOX_TITLE_WIDTH))?;
        ui::summary_row(out, "Created:", &item.created_at)?;
    }

    ui::section(out, "RECENTLY CURATED (may have been inbox)")?;
    if report.curated.is_empty() {
        ui::none_line(out, "No curated items")?;
    }
    for (i, item) in report.curated.iter().enumerate() {
        ui::item_line(out, i + 1, &[item.display_type()], &item.display_title(CURATED_TITLE_WIDTH))?;
        ui::summary_row(
            out,
            "Created:",
            &format!("{}, Updated: {}", item.created_at, item.updated_at.as_deref().unwrap_or("N/A")),
        )?;
    }

    ui::section(out, &format!("ITEMS CREATED LAST {} DAYS (by status)", report.window_days))?;
    match &report.window_counts {
        Some(window) if !window.is_empty() => {
            for (status, count) in &window.by_status {
                write_status_count(out, status, *count)?;
            }
        }
        _ => ui::none_line(out, &format!("No items in last {} days", report.window_days))?,
    }

    ui::section(out, "ITEMS CREATED TODAY")?;
    if report.today.is_empty() {
        ui::none_line(out, "No items created today")?;
    }
    for (i, item) in report.today.iter().enumerate() {
        ui::item_line(
            out,
            i + 1,
            &[item.status.as_str(), item.display_type()],
            &item.display_title(TODAY_TITLE_WIDTH),
        )?;
    }

    ui::closing(out, "Diagnostic complete.")
}

pub fn run_backups(config: &InspectConfig, limits: &ReportLimits, output_mode: OutputMode) -> anyhow::Result<()> {
    let report = report::build_backup_scan(config, limits)?;
    if output_mode.is_human() {
        render_backups(&mut io::stdout().lock(), &report)?;
    } else {
        emit_json(&report)?;
    }
    Ok(())
}

fn render_backups(out: &mut impl Write, report: &BackupScanReport) -> io::Result<()> {
    ui::banner(out, "doughub backup scan", &format!("Pattern {}", report.pattern))?;
    ui::status(out, Icons::DATABASE, "Backups directory", &report.directory.display().to_string())?;
    ui::status(out, Icons::INFO, "Exists", &report.exists.to_string())?;

    if report.exists {
        ui::status(out, Icons::STATS, "Found", &format!("{} backup database files", report.backups.len()))?;
        if !report.backups.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", ui::backup_table(&report.backups))?;
        }

        for backup in &report.backups {
            if let BackupOutcome::Inspected { inbox_sample, .. } = &backup.outcome {
                if inbox_sample.is_empty() {
                    continue;
                }
                ui::section(out, &format!("{} inbox items", backup.file_name))?;
                for item in inbox_sample {
                    writeln!(
                        out,
                        "    - {} {}",
                        format!("[{}]", item.display_type()).style(ui::theme().info.clone()),
                        item.display_title(BACKUP_TITLE_WIDTH)
                    )?;
                }
            }
        }
    } else {
        ui::warn(out, "Backups directory does not exist")?;
    }

    if let Some(template) = &report.template {
        ui::section(out, "TEMPLATE DATABASE")?;
        ui::status(out, Icons::DATABASE, "Found template database", &template.database.display().to_string())?;
        if let Some(size) = template.size_bytes {
            ui::status(out, Icons::FILE, "Size", &ui::human_kb(size))?;
        }
        match &template.outcome {
            Some(BackupOutcome::Inspected { counts, .. }) => {
                ui::summary_row(out, "Total items:", &counts.total.to_string())?;
                if !counts.is_empty() {
                    ui::summary_row(out, "By status:", &counts.compact())?;
                }
            }
            Some(BackupOutcome::MissingTable) => ui::none_line(out, "source_items table not found")?,
            Some(BackupOutcome::Failed { message }) => ui::summary_row(out, "Error:", message)?,
            None => {}
        }
    }

    ui::closing(out, "Backup scan complete.")
}

pub fn run_template(config: &InspectConfig, profile: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let report = report::build_template(config, profile)?;
    if output_mode.is_human() {
        render_template(&mut io::stdout().lock(), &report)?;
    } else {
        emit_json(&report)?;
    }
    Ok(())
}

fn render_template(out: &mut impl Write, report: &TemplateReport) -> io::Result<()> {
    ui::banner(out, "doughub template listing", &format!("Profile {}", report.profile))?;
    ui::status(out, Icons::DATABASE, "Template database", &report.database.display().to_string())?;
    ui::status(out, Icons::INFO, "Exists", &report.exists.to_string())?;

    if !report.exists {
        ui::warn(out, "Database does not exist, nothing to list")?;
        return ui::closing(out, "Template listing complete.");
    }
    if !report.table_present {
        ui::warn(out, "source_items table not found")?;
    }

    for group in &report.groups {
        ui::section(
            out,
            &format!("{} ITEMS ({} total)", group.status.as_str().to_uppercase(), group.items.len()),
        )?;
        if group.items.is_empty() {
            ui::none_line(out, &format!("No {} items", group.status))?;
            continue;
        }
        if group.status.as_str() == Status::INBOX {
            for (i, item) in group.items.iter().enumerate() {
                write_inbox_detail(out, i + 1, item)?;
            }
        } else {
            for item in &group.items {
                writeln!(out, "  {}", item.display_title(TEMPLATE_TITLE_WIDTH))?;
                ui::summary_row(out, "ID:", &format!("{}, Type: {}", item.id, item.display_type()))?;
            }
        }
    }

    if let Some(version) = report.schema_version {
        writeln!(out)?;
        ui::status(out, Icons::PACKAGE, "Schema version", &version.to_string())?;
    }
    ui::closing(out, "Template listing complete.")
}

fn write_inbox_detail(out: &mut impl Write, index: usize, item: &SourceItem) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}. ID: {}", index, item.id.style(ui::theme().info.clone()))?;
    writeln!(out, "   Title: {}", item.title.as_deref().unwrap_or(doughub_inspect::item::NO_TITLE))?;
    writeln!(
        out,
        "   Type: {} / {}",
        item.display_type(),
        item.source_name.as_deref().unwrap_or("?")
    )?;
    writeln!(out, "   Created: {}", ui::dim(&item.created_at))
}

fn write_status_count(out: &mut impl Write, status: &Status, count: u64) -> io::Result<()> {
    writeln!(out, "  {}: {}", status.as_str().style(ui::theme().status(status)), count)
}
