//! Locating, reading and validating the CLI's layout configuration.
//!
//! A configuration comes from the first [`ConfigSource`] that applies: the
//! `--config` path, `strata/config.toml` in the working directory, the
//! platform config directory, or the built-in defaults. Whatever file is
//! chosen must also pass [`AppConfig::validate`], so a bad gap or zoom limit
//! is reported against the file that set it rather than later by the engine.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use strata::{StrataError, config::AppConfig};

const LOCAL_CONFIG: &str = "strata/config.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid settings in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl From<ConfigError> for StrataError {
    fn from(err: ConfigError) -> Self {
        StrataError::Config(err.to_string())
    }
}

/// Where the effective configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given on the command line; it must exist.
    Explicit(PathBuf),
    /// `strata/config.toml` relative to the working directory.
    Local(PathBuf),
    /// `config.toml` in the platform config directory.
    Platform(PathBuf),
    /// No file found; built-in defaults apply.
    Defaults,
}

impl ConfigSource {
    /// Picks the source for `explicit`, falling back through the search path.
    pub fn locate(explicit: Option<impl AsRef<Path>>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.as_ref().to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Self::Local(local);
        }

        match ProjectDirs::from("com", "strata", "strata") {
            Some(dirs) => {
                let platform = dirs.config_dir().join("config.toml");
                if platform.is_file() {
                    return Self::Platform(platform);
                }
                debug!(path:% = platform.display(); "No platform configuration file");
            }
            None => debug!("Platform config directory is unknown"),
        }

        Self::Defaults
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::Platform(path) => Some(path),
            Self::Defaults => None,
        }
    }

    /// Reads and validates the configuration this source points at.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let Some(path) = self.path() else {
            debug!("Using default configuration");
            return Ok(AppConfig::default());
        };
        info!(source:% = self, path:% = path.display(); "Loading configuration");

        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::MissingFile(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate().map_err(|err| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: match err {
                StrataError::Config(reason) => reason,
                other => other.to_string(),
            },
        })?;

        debug!(
            orientation:% = config.layout().orientation(),
            passes = config.layout().ordering_passes();
            "Configuration loaded"
        );
        Ok(config)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(_) => write!(f, "explicit"),
            Self::Local(_) => write!(f, "local"),
            Self::Platform(_) => write!(f, "platform"),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// Locates and loads the configuration for one CLI run.
pub fn load_config(explicit: Option<impl AsRef<Path>>) -> Result<AppConfig, StrataError> {
    Ok(ConfigSource::locate(explicit).load()?)
}
