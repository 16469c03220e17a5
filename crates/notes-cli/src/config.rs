//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use notes_core::config::PresenterConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
const APP_DIR_NAME: &str = "notes";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Database used when neither `--db-path` nor `NOTES_DB_PATH` is set
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub presenter: PresenterConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            presenter: PresenterConfig::default(),
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

impl CliConfig {
    /// Load from `explicit`, `NOTES_CONFIG`, or the platform config dir.
    ///
    /// A missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match env::var_os("NOTES_CONFIG") {
                Some(path) => PathBuf::from(path),
                None => match default_config_path() {
                    Some(path) => path,
                    None => return Ok(Self::default()),
                },
            },
        };
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!("Failed to read config at {}: {}", path.display(), error))
        })?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!("Failed to parse config at {}: {}", path.display(), error))
        })?;
        config.normalize(path)
    }

    fn normalize(mut self, path: &Path) -> Result<Self, CliError> {
        self.presenter = self.presenter.validated().map_err(|error| {
            CliError::Config(format!("Invalid config at {}: {}", path.display(), error))
        })?;
        self.db_path = self
            .db_path
            .filter(|db_path| !db_path.as_os_str().is_empty());
        Ok(self)
    }

    /// Database path: flag, then `NOTES_DB_PATH`, then config, then default.
    pub fn resolve_db_path(&self, cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
        if let Some(path) = cli_db_path
            .or_else(|| env::var_os("NOTES_DB_PATH").map(PathBuf::from))
            .or_else(|| self.db_path.clone())
        {
            return Ok(path);
        }
        default_db_path()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("notes.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}
