//! Source item types
//!
//! A source item is one row of the application's `source_items` table.
//! Its `status` moves through a workflow (inbox -> processed / curated),
//! but the set of statuses is owned by the application, so it is kept
//! open rather than modelled as a closed enum.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder shown for items without a title
pub const NO_TITLE: &str = "(no title)";

/// Marker appended to truncated titles
pub const ELLIPSIS: &str = "...";

/// Workflow status of a source item.
///
/// Well-known values are exposed as constants; anything else read from a
/// database is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub const INBOX: &'static str = "inbox";
    pub const PROCESSED: &'static str = "processed";
    pub const CURATED: &'static str = "curated";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn inbox() -> Self {
        Self::new(Self::INBOX)
    }

    pub fn processed() -> Self {
        Self::new(Self::PROCESSED)
    }

    pub fn curated() -> Self {
        Self::new(Self::CURATED)
    }

    /// Get the string representation of the status
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the statuses the application is known to write
    pub fn is_known(&self) -> bool {
        matches!(self.0.as_str(), Self::INBOX | Self::PROCESSED | Self::CURATED)
    }
}

impl FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Status::new(s))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row of `source_items`.
///
/// Owned by the doughub application; the inspector only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    /// Unique identifier
    pub id: String,
    /// Display title, may be missing
    pub title: Option<String>,
    /// Classification tag (e.g. "qbank", "web")
    pub source_type: Option<String>,
    /// Human-readable origin of the item
    pub source_name: Option<String>,
    /// Workflow status
    pub status: Status,
    /// Creation timestamp, ISO-like and lexicographically sortable
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: Option<String>,
}

impl SourceItem {
    /// Title cut to `width` characters for display
    pub fn display_title(&self, width: usize) -> String {
        truncate_title(self.title.as_deref(), width)
    }

    /// Source type for display, `?` when unset
    pub fn display_type(&self) -> &str {
        self.source_type.as_deref().unwrap_or("?")
    }
}

/// Shorten a title for display.
///
/// Titles longer than `width` characters keep their first `width`
/// characters followed by [`ELLIPSIS`]. Missing or empty titles become
/// [`NO_TITLE`]. Everything else is returned unchanged.
pub fn truncate_title(title: Option<&str>, width: usize) -> String {
    match title {
        None | Some("") => NO_TITLE.to_string(),
        Some(t) => match t.char_indices().nth(width) {
            Some((cut, _)) => format!("{}{}", &t[..cut], ELLIPSIS),
            None => t.to_string(),
        },
    }
}
