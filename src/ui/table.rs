use tabled::{settings::Style, Table, Tabled};

use crate::storage::{BackupOutcome, BackupReport, StatusCounts};
use crate::ui::human_kb;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Status")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One row per status plus a trailing TOTAL row
pub fn status_table(counts: &StatusCounts) -> String {
    let mut builder = TableBuilder::new();
    for (status, count) in &counts.by_status {
        builder.add_row(status.as_str(), &count.to_string());
    }
    builder.add_row("TOTAL", &counts.total.to_string());
    builder.build()
}

#[derive(Tabled)]
pub struct BackupRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Taken")]
    pub taken: String,
    #[tabled(rename = "Status counts")]
    pub statuses: String,
    #[tabled(rename = "Total")]
    pub total: String,
}

impl BackupRow {
    pub fn from_report(report: &BackupReport) -> Self {
        let (statuses, total) = match &report.outcome {
            BackupOutcome::Inspected { counts, .. } if counts.is_empty() => ("(empty table)".to_string(), "0".to_string()),
            BackupOutcome::Inspected { counts, .. } => (counts.compact(), counts.total.to_string()),
            BackupOutcome::MissingTable => ("(source_items table not found)".to_string(), "-".to_string()),
            BackupOutcome::Failed { message } => (format!("Error: {}", message), "-".to_string()),
        };

        Self {
            file: report.file_name.clone(),
            size: report.size_bytes.map(human_kb).unwrap_or_else(|| "?".to_string()),
            taken: report
                .taken_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            statuses,
            total,
        }
    }
}

/// Summary table of a backup scan
pub fn backup_table(reports: &[BackupReport]) -> String {
    if reports.is_empty() {
        return String::new();
    }

    let rows: Vec<BackupRow> = reports.iter().map(BackupRow::from_report).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
