//! Line helpers for text reports.
//!
//! Every helper writes to the given sink so reports can be rendered to
//! stdout or captured in a buffer.

use std::io::{self, Write};

use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

const RULE_WIDTH: usize = 60;

/// Title line followed by a subtitle and a rule
pub fn banner(out: &mut impl Write, title: &str, subtitle: &str) -> io::Result<()> {
    writeln!(out, "{}", title.style(theme().header.clone()))?;
    writeln!(out, "  {}", subtitle.style(theme().dim.clone()))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).style(theme().muted.clone()))
}

/// Closing rule and message printed at the end of every command
pub fn closing(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).style(theme().muted.clone()))?;
    success(out, text)
}

pub fn status(out: &mut impl Write, icon: &str, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "{} {}: {}", icon, label.style(theme().dim.clone()), value)
}

pub fn success(out: &mut impl Write, label: &str) -> io::Result<()> {
    writeln!(out, "{} {}", Icons::CHECK, label.style(theme().success.clone()))
}

pub fn warn(out: &mut impl Write, label: &str) -> io::Result<()> {
    writeln!(out, "{} {}", Icons::WARN, label.style(theme().warn.clone()))
}

pub fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "━━ {} ━━", title.style(theme().header.clone()))
}

/// Placeholder line for an empty section, e.g. `(No inbox items found)`
pub fn none_line(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "  {}", format!("({})", text).style(theme().muted.clone()))
}

/// Numbered listing line: `  3. [tag][tag] title`
pub fn item_line(out: &mut impl Write, index: usize, tags: &[&str], title: &str) -> io::Result<()> {
    let tags: String = tags.iter().map(|t| format!("[{}]", t)).collect();
    writeln!(out, "  {}. {} {}", index, tags.style(theme().info.clone()), title)
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn summary_row(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "     {} {}", label.style(theme().dim.clone()), value)
}

/// Size in kibibytes with one decimal, e.g. `12.5 KB`
pub fn human_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
