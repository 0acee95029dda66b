//
//  commit-info
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O Module
//!
//! Low-level file operations behind [`Config`](super::Config): reading,
//! writing and probing the TOML file.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use commit_info::config::{config_exists, read_config_file, write_config_file};
//!
//! let path = Path::new("/tmp/commit-info/config.toml");
//! if !config_exists(path) {
//!     write_config_file(path, "[resolve]\nhash_length = 10\n")?;
//! }
//! println!("{}", read_config_file(path)?);
//! # Ok::<(), commit_info::config::ConfigError>(())
//! ```
//!
//! ## Notes
//!
//! - Write operations create parent directories
//! - Errors carry the offending path

use std::path::Path;

use super::ConfigError;

/// Reads the whole configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] naming `path` if the file cannot be read.
pub fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] naming `path` if a directory or the file
/// cannot be written.
pub fn write_config_file(path: &Path, content: &str) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}

/// True if something exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.exists()
}
