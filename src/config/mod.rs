//
//  commit-info
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module loads and saves the commit-info configuration, stored as TOML
//! in a platform-specific directory. Command-line flags override whatever
//! the file says.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/commit-info/config.toml`
//! - **macOS**: `~/Library/Application Support/commit-info/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\commit-info\config\config.toml`
//!
//! A different file can be selected with `--config` or `COMMIT_INFO_CONFIG`.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [resolve]
//! hash_length = 10
//! use_git = true
//! skip_status = false
//! fill_missing = true
//!
//! [git]
//! program = "/usr/local/bin/git"
//! timeout_secs = 5
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use commit_info::config::Config;
//!
//! let mut config = Config::load(None)?;
//! config.set("hash_length", "12")?;
//! config.save(None)?;
//!
//! let options = config.resolve_options()?;
//! assert_eq!(options.hash_length.get(), 12);
//! # Ok::<(), commit_info::config::ConfigError>(())
//! ```

mod file;

pub use file::*;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::{ResolveOptions, DEFAULT_GIT_TIMEOUT, DEFAULT_HASH_LENGTH};

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "hash_length",
    "use_git",
    "skip_status",
    "fill_missing",
    "git_program",
    "git_timeout_secs",
];

/// Errors raised while loading, saving or editing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown configuration key '{key}'. Valid keys: {}", CONFIG_KEYS.join(", "))]
    UnknownKey { key: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Global configuration container.
///
/// All fields use `#[serde(default)]`, so a partial or empty file is valid.
///
/// # Example
///
/// ```rust
/// use commit_info::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.resolve.hash_length, 7);
/// assert!(config.resolve.use_git);
/// assert_eq!(config.git.program, "git");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// How metadata is resolved.
    #[serde(default)]
    pub resolve: ResolveConfig,

    /// How the `git` executable is invoked.
    #[serde(default)]
    pub git: GitConfig,
}

/// Resolution settings. Mirrors [`ResolveOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolveConfig {
    /// Number of commit hash characters to keep. Must be at least 1.
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Ask `git` first. When false only `.git` files are read.
    #[serde(default = "default_true")]
    pub use_git: bool,

    /// Skip `git status` and the origin lookup.
    #[serde(default)]
    pub skip_status: bool,

    /// Fill an empty branch or origin from `.git` files after `git` ran.
    #[serde(default)]
    pub fill_missing: bool,
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH.get()
}

fn default_true() -> bool {
    true
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            hash_length: default_hash_length(),
            use_git: true,
            skip_status: false,
            fill_missing: false,
        }
    }
}

/// Settings for the `git` executable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitConfig {
    /// Program name or full path.
    #[serde(default = "default_git_program")]
    pub program: String,

    /// Seconds before a `git` invocation is killed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_GIT_TIMEOUT.as_secs()
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_git_program(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitConfig {
    /// The invocation timeout as a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout, which would
    /// make every `git` query time out immediately.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(invalid(
                "git_timeout_secs",
                &self.timeout_secs.to_string(),
                "must be at least 1",
            ));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        if !config_exists(&path) {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = read_config_file(&path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Saves the configuration to `path`, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        let content = toml::to_string_pretty(self)?;
        write_config_file(&path, &content)
    }

    /// Default location of the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME).ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Converts the file settings into resolver options.
    pub fn resolve_options(&self) -> Result<ResolveOptions, ConfigError> {
        let hash_length = NonZeroUsize::new(self.resolve.hash_length).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "hash_length".to_string(),
                value: self.resolve.hash_length.to_string(),
                reason: "must be at least 1".to_string(),
            }
        })?;
        Ok(ResolveOptions {
            hash_length,
            use_git: self.resolve.use_git,
            skip_status: self.resolve.skip_status,
            fill_missing_from_files: self.resolve.fill_missing,
        })
    }

    /// Returns the value stored under `key` as a string.
    ///
    /// # Returns
    ///
    /// `None` if `key` is not one of [`CONFIG_KEYS`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use commit_info::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("git_program").as_deref(), Some("git"));
    /// assert_eq!(config.get("editor"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "hash_length" => Some(self.resolve.hash_length.to_string()),
            "use_git" => Some(self.resolve.use_git.to_string()),
            "skip_status" => Some(self.resolve.skip_status.to_string()),
            "fill_missing" => Some(self.resolve.fill_missing.to_string()),
            "git_program" => Some(self.git.program.clone()),
            "git_timeout_secs" => Some(self.git.timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Parses `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownKey`] if `key` is not one of [`CONFIG_KEYS`]
    /// - [`ConfigError::InvalidValue`] if `value` does not parse or is out of range
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "hash_length" => {
                let len = parse_value::<usize>(key, value)?;
                if len == 0 {
                    return Err(invalid(key, value, "must be at least 1"));
                }
                self.resolve.hash_length = len;
            }
            "use_git" => self.resolve.use_git = parse_value(key, value)?,
            "skip_status" => self.resolve.skip_status = parse_value(key, value)?,
            "fill_missing" => self.resolve.fill_missing = parse_value(key, value)?,
            "git_program" => {
                if value.trim().is_empty() {
                    return Err(invalid(key, value, "must not be empty"));
                }
                self.git.program = value.to_string();
            }
            "git_timeout_secs" => {
                let secs = parse_value::<u64>(key, value)?;
                if secs == 0 {
                    return Err(invalid(key, value, "must be at least 1"));
                }
                self.git.timeout_secs = secs;
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, &e.to_string()))
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
