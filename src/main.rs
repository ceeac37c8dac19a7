//! doughub-inspect CLI - read-only diagnostics for doughub databases

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use doughub_inspect::config::{self, InspectConfig};
use doughub_inspect::report::ReportLimits;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doughub-inspect")]
#[command(version)]
#[command(about = "Read-only diagnostics for doughub SQLite databases")]
#[command(long_about = r#"
doughub-inspect opens doughub databases strictly read-only and reports on
their source items:
  • Status breakdowns and recent inbox / curated items
  • Items created in a trailing window and today
  • Status counts across every backup copy

Example usage:
  doughub-inspect diagnose
  doughub-inspect backups --sample 3
  doughub-inspect --format json template
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Application-data directory (defaults to %APPDATA%, then XDG config dir)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Profile directory under the base directory
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputMode,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the current profile database
    Diagnose {
        /// Maximum number of inbox items to list
        #[arg(short, long, default_value = "15")]
        limit: usize,

        /// Maximum number of curated items to list
        #[arg(long, default_value = "10")]
        curated_limit: usize,

        /// Size of the trailing window in days
        #[arg(short, long, default_value = "14")]
        days: u32,
    },

    /// Scan every database in the backups directory
    Backups {
        /// Glob selecting backup files (defaults to "*.db")
        #[arg(short, long)]
        pattern: Option<String>,

        /// Inbox items to sample per backup
        #[arg(short, long, default_value = "5")]
        sample: usize,
    },

    /// List every item of an alternate profile database
    Template {
        /// Profile to list (defaults to the template profile)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Text
    }
}

/// Print a report as pretty JSON
pub fn emit_json<T: serde::Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<InspectConfig> {
    let file = config::load_config(cli.config.as_deref())?;

    let base_dir = match (&cli.base_dir, file.as_ref().and_then(|f| f.base_dir.as_ref())) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => config::default_base_dir()
            .ok_or_else(|| anyhow::anyhow!("cannot determine the application-data directory; pass --base-dir"))?,
    };

    let mut resolved = InspectConfig::new(&base_dir);
    if let Some(file) = &file {
        resolved = resolved.apply_file(file);
        resolved.base_dir = base_dir;
    }
    if let Some(profile) = &cli.profile {
        resolved.profile_name = profile.clone();
    }
    Ok(resolved)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    doughub_inspect::ui::init_theme(cli.no_color);

    let mut config = resolve_config(&cli)?;
    tracing::debug!("Resolved config: {:?}", config);

    match cli.command {
        Commands::Diagnose { limit, curated_limit, days } => {
            let limits = ReportLimits {
                inbox: limit,
                curated: curated_limit,
                window_days: days,
                ..ReportLimits::default()
            };
            commands::run_diagnose(&config, &limits, cli.format)?;
        }

        Commands::Backups { pattern, sample } => {
            if let Some(pattern) = pattern {
                config.backup_pattern = pattern;
            }
            let limits = ReportLimits {
                backup_sample: sample,
                ..ReportLimits::default()
            };
            commands::run_backups(&config, &limits, cli.format)?;
        }

        Commands::Template { name } => {
            let profile = name.unwrap_or_else(|| config.template_profile.clone());
            commands::run_template(&config, &profile, cli.format)?;
        }
    }

    Ok(())
}
