//! Locating and reading the umlkit configuration.
//!
//! An explicit `--config` path always wins and must exist. Otherwise the
//! first existing file among [`config_candidates`] is read, and the built-in
//! defaults apply when there is none.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use umlkit::{UmlError, config::AppConfig};

/// File name looked up in every configuration directory.
const CONFIG_FILE: &str = "config.toml";

/// Directory, relative to the working directory, holding a project config.
const PROJECT_DIR: &str = "umlkit";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for UmlError {
    fn from(err: ConfigError) -> Self {
        UmlError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit,
    Project,
    User,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "explicit",
            Self::Project => "project",
            Self::User => "user",
        })
    }
}

/// Implicit configuration locations below `working_dir`, in lookup order:
/// the project's `umlkit/config.toml`, then the per-user config directory.
pub fn config_candidates(working_dir: &Path) -> Vec<(ConfigSource, PathBuf)> {
    let mut candidates = vec![(
        ConfigSource::Project,
        working_dir.join(PROJECT_DIR).join(CONFIG_FILE),
    )];
    match ProjectDirs::from("com", "umlkit", "umlkit") {
        Some(dirs) => candidates.push((ConfigSource::User, dirs.config_dir().join(CONFIG_FILE))),
        None => debug!("No per-user configuration directory on this platform"),
    }
    candidates
}

/// Loads the editor configuration.
///
/// # Errors
///
/// Returns [`UmlError::Config`] when an explicit path does not exist or a
/// found file is not a valid configuration.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, UmlError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        return read_config(ConfigSource::Explicit, path);
    }

    load_first_existing(&config_candidates(Path::new(".")))
}

/// Reads the first existing candidate, or falls back to the defaults.
fn load_first_existing(candidates: &[(ConfigSource, PathBuf)]) -> Result<AppConfig, UmlError> {
    for (source, path) in candidates {
        if path.exists() {
            return read_config(*source, path);
        }
        debug!(source:%, path:? = path; "No configuration file");
    }

    debug!("Using default configuration");
    Ok(AppConfig::default())
}

fn read_config(source: ConfigSource, path: &Path) -> Result<AppConfig, UmlError> {
    info!(source:%, path:? = path; "Loading configuration");
    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })?;
    Ok(config)
}
