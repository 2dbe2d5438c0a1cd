//! Project configuration: `tidemark.toml` plus command-line overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tidemark_engine::DEFAULT_GROUP_SIZE;

use crate::cli::StoreArgs;
use crate::error::CliResult;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tidemark.toml";

/// On-disk project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Script loading settings.
    #[serde(default)]
    pub scripts: ScriptsConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// `[scripts]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Directory holding the SQL scripts.
    #[serde(default = "default_scripts_dir")]
    pub dir: PathBuf,
    /// Repeatable scripts per concurrent group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            dir: default_scripts_dir(),
            group_size: default_group_size(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("./scripts")
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./tidemark.db")
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `tidemark.toml` from the working directory if present, else
    /// defaults.
    pub fn load_or_default() -> CliResult<Self> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Effective settings after merging config file and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the SQL scripts.
    pub scripts_dir: PathBuf,
    /// Path to the SQLite database file.
    pub database: PathBuf,
    /// Repeatable scripts per concurrent group.
    pub group_size: usize,
}

impl Settings {
    /// Resolve settings: flags override the config file, which overrides
    /// defaults.
    pub fn resolve(store: &StoreArgs, group_size: Option<usize>) -> CliResult<Self> {
        let config = match &store.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default()?,
        };

        Ok(Self {
            scripts_dir: store.dir.clone().unwrap_or(config.scripts.dir),
            database: store.database.clone().unwrap_or(config.database.path),
            group_size: group_size.unwrap_or(config.scripts.group_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scripts.dir, PathBuf::from("./scripts"));
        assert_eq!(config.scripts.group_size, DEFAULT_GROUP_SIZE);
        assert_eq!(config.database.path, PathBuf::from("./tidemark.db"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [scripts]
            dir = "db/scripts"
            "#,
        )
        .unwrap();
        assert_eq!(config.scripts.dir, PathBuf::from("db/scripts"));
        // Unset keys fall back to defaults.
        assert_eq!(config.scripts.group_size, DEFAULT_GROUP_SIZE);
        assert_eq!(config.database.path, PathBuf::from("./tidemark.db"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tidemark.toml");
        std::fs::write(
            &config_path,
            "[scripts]\ndir = \"from_file\"\ngroup_size = 4\n",
        )
        .unwrap();

        let store = StoreArgs {
            dir: Some(PathBuf::from("from_flag")),
            database: None,
            config: Some(config_path),
        };
        let settings = Settings::resolve(&store, None).unwrap();
        assert_eq!(settings.scripts_dir, PathBuf::from("from_flag"));
        assert_eq!(settings.group_size, 4);
        assert_eq!(settings.database, PathBuf::from("./tidemark.db"));
    }
}
