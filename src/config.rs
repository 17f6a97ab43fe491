//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config.toml` in the platform config directory
//! 3. Environment variables prefixed with `DUPEFINDER_`
//!    (e.g. `DUPEFINDER_MIN_SIZE=4096`)
//!
//! Command-line flags are applied on top by the CLI layer.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeleteMode;
use crate::duplicates::Criteria;
use crate::scanner::DEFAULT_BUFFER_SIZE;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPEFINDER_";

/// Errors from loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    /// A layer could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// Serializing the configuration failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Writing the configuration file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Persistent defaults for scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Match on case-folded file name
    pub match_name: bool,
    /// Match on size
    pub match_size: bool,
    /// Match on modification time
    pub match_date: bool,
    /// Match on content digest
    pub match_content: bool,
    /// Skip empty files
    pub ignore_zero_length: bool,
    /// Skip hidden files
    pub ignore_hidden: bool,
    /// Skip system files
    pub ignore_system: bool,
    /// Skip read-only files
    pub ignore_read_only: bool,
    /// Smallest accepted size in bytes
    pub min_size: u64,
    /// Largest accepted size in bytes
    pub max_size: u64,
    /// Paths always excluded
    pub exclude: Vec<PathBuf>,
    /// Read chunk size for hashing
    pub hash_buffer_size: usize,
    /// Deletion mode when none is given on the command line
    pub delete_mode: DeleteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_name: true,
            match_size: true,
            match_date: false,
            match_content: true,
            ignore_zero_length: true,
            ignore_hidden: false,
            ignore_system: false,
            ignore_read_only: false,
            min_size: 0,
            max_size: 1024 * 1024 * 1024,
            exclude: Vec::new(),
            hash_buffer_size: DEFAULT_BUFFER_SIZE,
            delete_mode: DeleteMode::Permanent,
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// Falls back to defaults (with a warning) when a layer is invalid.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::config_path().ok();
        match Self::load_from(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration using `path` as the TOML layer.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the file or environment holds
    /// values of the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(path)
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// The layered figment for `path`.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Save the configuration to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be determined or written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(write_err)
    }

    /// Default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when no home directory is known.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("org", "dupefinder", "dupefinder")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Scan criteria seeded from this configuration.
    ///
    /// Include roots are left empty for the caller to fill in.
    #[must_use]
    pub fn to_criteria(&self) -> Criteria {
        Criteria::default()
            .with_match_name(self.match_name)
            .with_match_size(self.match_size)
            .with_match_date(self.match_date)
            .with_match_content(self.match_content)
            .with_ignore_zero_length(self.ignore_zero_length)
            .with_ignore_hidden(self.ignore_hidden)
            .with_ignore_system(self.ignore_system)
            .with_ignore_read_only(self.ignore_read_only)
            .with_size_bounds(self.min_size, self.max_size)
            .with_exclude_roots(self.exclude.clone())
    }
}
