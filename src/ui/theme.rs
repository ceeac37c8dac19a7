use owo_colors::Style;
use std::sync::OnceLock;

use crate::item::Status;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub inbox: Style,
    pub curated: Style,
    pub processed: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() || std::env::var_os("NO_COLOR").is_some() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            inbox: Style::new().yellow(),
            curated: Style::new().green(),
            processed: Style::new().blue(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            inbox: Style::new(),
            curated: Style::new(),
            processed: Style::new(),
        }
    }

    /// Style for a workflow status; unknown statuses are muted
    pub fn status(&self, status: &Status) -> Style {
        match status.as_str() {
            Status::INBOX => self.inbox.clone(),
            Status::CURATED => self.curated.clone(),
            Status::PROCESSED => self.processed.clone(),
            _ => self.muted.clone(),
        }
    }
}

/// Force a theme before first use (e.g. `--no-color`)
pub fn init_theme(plain: bool) {
    let _ = THEME.set(if plain { Theme::plain() } else { Theme::detect() });
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
