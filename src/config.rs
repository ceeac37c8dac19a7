use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "doughub";
pub const DEFAULT_TEMPLATE_PROFILE: &str = "doughub---template-react-ts";
pub const DEFAULT_DB_FILE: &str = "doughub.db";
pub const DEFAULT_BACKUPS_SUBDIR: &str = "backups";
pub const DEFAULT_BACKUP_PATTERN: &str = "*.db";

/// Where to find the databases to inspect.
///
/// Passed explicitly to every report builder; nothing below the CLI reads
/// the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectConfig {
    /// Application-data root (e.g. `%APPDATA%`)
    pub base_dir: PathBuf,
    /// Profile directory under `base_dir`
    pub profile_name: String,
    /// Database file relative to the profile directory
    pub relative_db_path: PathBuf,
    /// Alternate profile listed by the `template` command
    pub template_profile: String,
    /// Backups directory relative to the profile directory
    pub backups_subdir: PathBuf,
    /// Glob selecting backup files inside the backups directory
    pub backup_pattern: String,
}

impl InspectConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            profile_name: DEFAULT_PROFILE.to_string(),
            relative_db_path: PathBuf::from(DEFAULT_DB_FILE),
            template_profile: DEFAULT_TEMPLATE_PROFILE.to_string(),
            backups_subdir: PathBuf::from(DEFAULT_BACKUPS_SUBDIR),
            backup_pattern: DEFAULT_BACKUP_PATTERN.to_string(),
        }
    }

    pub fn profile_dir(&self, profile: &str) -> PathBuf {
        self.base_dir.join(profile)
    }

    /// Database of an arbitrary profile
    pub fn profile_db_path(&self, profile: &str) -> PathBuf {
        self.profile_dir(profile).join(&self.relative_db_path)
    }

    /// Current database: `<base>/<profile>/<relative_db_path>`
    pub fn db_path(&self) -> PathBuf {
        self.profile_db_path(&self.profile_name)
    }

    /// Template profile database
    pub fn template_db_path(&self) -> PathBuf {
        self.profile_db_path(&self.template_profile)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.profile_dir(&self.profile_name).join(&self.backups_subdir)
    }

    /// Overlay the values set in a config file
    pub fn apply_file(mut self, file: &ConfigFile) -> Self {
        if let Some(base) = &file.base_dir {
            self.base_dir = PathBuf::from(base);
        }
        if let Some(profile) = &file.profile {
            self.profile_name = profile.clone();
        }
        if let Some(rel) = &file.relative_db_path {
            self.relative_db_path = PathBuf::from(rel);
        }
        if let Some(template) = &file.template_profile {
            self.template_profile = template.clone();
        }
        if let Some(subdir) = &file.backups_subdir {
            self.backups_subdir = PathBuf::from(subdir);
        }
        if let Some(pattern) = &file.backup_pattern {
            self.backup_pattern = pattern.clone();
        }
        self
    }
}

/// On-disk configuration; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    pub base_dir: Option<String>,
    pub profile: Option<String>,
    pub template_profile: Option<String>,
    pub relative_db_path: Option<String>,
    pub backups_subdir: Option<String>,
    pub backup_pattern: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("doughub-inspect.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ConfigFile>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Application-data root from the environment.
///
/// `APPDATA` on Windows, then `XDG_CONFIG_HOME`, then `$HOME/.config`.
pub fn default_base_dir() -> Option<PathBuf> {
    let non_empty = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    non_empty("APPDATA")
        .or_else(|| non_empty("XDG_CONFIG_HOME"))
        .or_else(|| non_empty("HOME").map(|home| home.join(".config")))
}
