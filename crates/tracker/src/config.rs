//! Configuration management using trophytrack.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trophytrack_core::{DifficultyMode, SortOrder};

use crate::error::Result;

pub const CONFIG_PATH: &str = "trophytrack.toml";

/// Environment variable that overrides the store location
pub const STORE_ENV: &str = "TROPHYTRACK_STORE";

const STORE_FILE: &str = "trophy_tracker.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backing store file (None = app data directory)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Where exports go when no output path is given (None = current directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// How the difficulty range interacts with the checklist-required filter
    #[serde(default)]
    pub difficulty_mode: DifficultyMode,

    /// Column to sort the planning view by when none is given
    #[serde(default)]
    pub default_sort_by: Option<String>,

    #[serde(default = "default_sort_ascending")]
    pub default_sort_ascending: bool,

    /// Number of trophy types listed on the dashboard (default: 10)
    #[serde(default = "default_type_limit")]
    pub type_distribution_limit: usize,
}

fn default_sort_ascending() -> bool {
    true
}

fn default_type_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            export_dir: None,
            difficulty_mode: DifficultyMode::default(),
            default_sort_by: None,
            default_sort_ascending: default_sort_ascending(),
            type_distribution_limit: default_type_limit(),
        }
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Error parsing {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Error reading {}: {}", path.display(), e),
            }
        }
        Config::default()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_ascending(self.default_sort_ascending)
    }

    /// Store location: explicit override, then the environment, then the
    /// config file, then the app data directory.
    pub fn resolve_store_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Some(path) = std::env::var_os(STORE_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.store_path {
            return path.clone();
        }
        default_store_path()
    }

    pub fn export_path(&self, file_name: &str) -> PathBuf {
        match &self.export_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Get the path to the store file in the app's data directory
fn default_store_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "TrophyTrack") {
        let data_dir = proj_dirs.data_dir();
        if let Err(e) = fs::create_dir_all(data_dir) {
            tracing::warn!("Failed to create data directory: {}", e);
            return PathBuf::from(STORE_FILE);
        }
        data_dir.join(STORE_FILE)
    } else {
        PathBuf::from(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.type_distribution_limit, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        fs::write(&path, "difficulty_mode = \"checklist_gated\"\ndefault_sort_ascending = false\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.difficulty_mode, DifficultyMode::ChecklistGated);
        assert_eq!(config.sort_order(), SortOrder::Descending);
        assert_eq!(config.type_distribution_limit, 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        let config = Config {
            store_path: Some(dir.path().join("store.db")),
            default_sort_by: Some("Estimated Time".into()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config { store_path: Some("from_config.db".into()), ..Config::default() };
        assert_eq!(
            config.resolve_store_path(Some(Path::new("cli.db"))),
            PathBuf::from("cli.db")
        );
        assert_eq!(config.export_path("SessionPlan.xlsx"), PathBuf::from("SessionPlan.xlsx"));
    }
}
