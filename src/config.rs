//! Optional TOML configuration. Every field may be omitted; missing values
//! fall back to defaults so running without a config file just works.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use thiserror::Error;

/// Where an emulated console keeps the profile database, relative to the
/// user's data directory.
const DEFAULT_DATABASE: &str = "dolphin-emu/Wii/shared2/menu/FaceLib/RFL_DB.dat";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const APP_NAME: &str = "profile-name-editor";

const DEFAULT_FPS: u32 = 60;
const MAX_FPS: u32 = 240;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHome,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk shape of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    frames_per_second: Option<u32>,
    log_level: Option<String>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub frames_per_second: u32,
    pub log_level: String,
}

impl Config {
    /// Load `<config_dir>/profile-name-editor/config.toml` if it exists and
    /// fill in defaults for everything it leaves out.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => ConfigFile::default(),
        };
        resolve(file, BaseDirs::new())
    }

    /// Parse config text, resolving defaults against `data_dir`.
    pub fn from_toml_str(text: &str, data_dir: &Path) -> Result<Self, toml::de::Error> {
        let mut file: ConfigFile = toml::from_str(text)?;
        let database_path = file
            .database_path
            .take()
            .unwrap_or_else(|| data_dir.join(DEFAULT_DATABASE));
        Ok(resolve_with(file, database_path))
    }
}

/// Platform config file location.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Directory for the log file.
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_local_dir().join("logs"))
}

fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(mut file: ConfigFile, base_dirs: Option<BaseDirs>) -> Result<Config, ConfigError> {
    let database_path = match (file.database_path.take(), base_dirs) {
        (Some(path), _) => path,
        (None, Some(dirs)) => dirs.data_dir().join(DEFAULT_DATABASE),
        (None, None) => return Err(ConfigError::NoHome),
    };
    Ok(resolve_with(file, database_path))
}

fn resolve_with(file: ConfigFile, database_path: PathBuf) -> Config {
    let frames_per_second = file
        .frames_per_second
        .unwrap_or(DEFAULT_FPS)
        .clamp(1, MAX_FPS);
    let log_level = file
        .log_level
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    Config {
        database_path,
        frames_per_second,
        log_level,
    }
}
